use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use url::form_urlencoded;

/// Query parameters in first-seen order, each name holding every value given for it.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Query {
    params: Vec<(String, Vec<String>)>,
}

impl Query {
    pub fn new() -> Self { Self::default() }

    /// Parse an `application/x-www-form-urlencoded` string. Blank values are dropped.
    pub fn parse(input: &str) -> Self {
        let mut query = Self::new();
        for (name, value) in form_urlencoded::parse(input.trim_start_matches('?').as_bytes()) {
            if !value.is_empty() {
                query.append(name.into_owned(), value.into_owned());
            }
        }
        query
    }

    pub fn is_empty(&self) -> bool { self.params.is_empty() }

    pub fn len(&self) -> usize { self.params.len() }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.params.push((name, vec![value])),
        }
    }

    /// Replace every value of `name`.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.params.push((name, values)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let pos = self.params.iter().position(|(n, _)| n == name)?;
        Some(self.params.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// One `(name, value)` pair per value, as sent on the wire.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .flat_map(|(n, values)| values.iter().map(move |v| (n.clone(), v.clone())))
            .collect()
    }

    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, values) in &self.params {
            for value in values {
                serializer.append_pair(name, value);
            }
        }
        serializer.finish()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.encode()) }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (k, v) in iter {
            query.append(k, v);
        }
        query
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for (name, values) in &self.params {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}
