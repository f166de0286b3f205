use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The path part of a URL, with POSIX pure-path semantics.
///
/// Repeated separators and `.` segments are dropped on construction, `..` is
/// kept verbatim. Unlike a filesystem path the empty path renders as `""`
/// rather than `"."`.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlPath {
    rooted:   bool,
    segments: Vec<String>,
}

impl UrlPath {
    pub fn new(path: &str) -> Self {
        Self {
            rooted:   path.starts_with('/'),
            segments: split_segments(path).map(str::to_string).collect(),
        }
    }

    pub fn root() -> Self {
        Self {
            rooted:   true,
            segments: Vec::new(),
        }
    }

    pub fn is_absolute(&self) -> bool { self.rooted }

    pub fn is_empty(&self) -> bool { !self.rooted && self.segments.is_empty() }

    /// `/` (when rooted) followed by each segment.
    pub fn parts(&self) -> Vec<&str> {
        let root = self.rooted.then_some("/");
        root.into_iter()
            .chain(self.segments.iter().map(String::as_str))
            .collect()
    }

    pub fn segments(&self) -> &[String] { &self.segments }

    pub fn name(&self) -> &str { self.segments.last().map(String::as_str).unwrap_or("") }

    pub fn suffix(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(i) if i > 0 && i < name.len() - 1 => &name[i..],
            _ => "",
        }
    }

    pub fn suffixes(&self) -> Vec<String> {
        let name = self.name();
        if name.ends_with('.') {
            return Vec::new();
        }
        name.trim_start_matches('.')
            .split('.')
            .skip(1)
            .map(|s| format!(".{s}"))
            .collect()
    }

    pub fn stem(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(i) if i > 0 && i < name.len() - 1 => &name[..i],
            _ => name,
        }
    }

    pub fn parent(&self) -> Self {
        let mut parent = self.clone();
        parent.segments.pop();
        parent
    }

    /// Logical ancestors, nearest first.
    pub fn parents(&self) -> Vec<Self> {
        let mut out = Vec::with_capacity(self.segments.len());
        let mut current = self.clone();
        while !current.segments.is_empty() {
            current = current.parent();
            out.push(current.clone());
        }
        out
    }

    /// Join `other` onto this path. An absolute `other` replaces it.
    pub fn join(&self, other: &str) -> Self {
        if other.starts_with('/') {
            return Self::new(other);
        }
        let mut joined = self.clone();
        joined.segments.extend(split_segments(other).map(str::to_string));
        joined
    }

    pub fn with_name(&self, name: &str) -> Result<Self> {
        if self.segments.is_empty() {
            return Err(Error::EmptyName(format!("{self:?}")));
        }
        if name.is_empty() || name == "." || name.contains('/') {
            return Err(Error::InvalidName(name.to_string()));
        }
        let mut renamed = self.clone();
        if let Some(last) = renamed.segments.last_mut() {
            *last = name.to_string();
        }
        Ok(renamed)
    }

    /// Replace the final suffix. An empty `suffix` removes it.
    pub fn with_suffix(&self, suffix: &str) -> Result<Self> {
        if suffix.contains('/') || (!suffix.is_empty() && (!suffix.starts_with('.') || suffix == "."))
        {
            return Err(Error::InvalidSuffix(suffix.to_string()));
        }
        if self.segments.is_empty() {
            return Err(Error::EmptyName(format!("{self:?}")));
        }
        let name = format!("{}{suffix}", self.stem());
        self.with_name(&name)
    }

    /// The part of this path below `base`, as a relative path.
    pub fn relative_to(&self, base: &UrlPath) -> Result<Self> {
        let not_relative = || Error::NotRelative {
            path: format!("{self:?}"),
            base: format!("{base:?}"),
        };

        if self.rooted != base.rooted || !self.segments.starts_with(&base.segments) {
            return Err(not_relative());
        }
        Ok(Self {
            rooted:   false,
            segments: self.segments[base.segments.len()..].to_vec(),
        })
    }

    /// The same path with a leading `/`.
    pub fn rooted(&self) -> Self {
        Self {
            rooted:   true,
            segments: self.segments.clone(),
        }
    }

    pub fn as_string(&self) -> String { self.to_string() }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".")
}

impl fmt::Display for UrlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rooted {
            f.write_str("/")?;
        }
        f.write_str(&self.segments.join("/"))
    }
}

impl fmt::Debug for UrlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "UrlPath('{self}')") }
}

impl From<&str> for UrlPath {
    fn from(path: &str) -> Self { Self::new(path) }
}

impl From<String> for UrlPath {
    fn from(path: String) -> Self { Self::new(&path) }
}

impl std::str::FromStr for UrlPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> { Ok(Self::new(s)) }
}

impl Serialize for UrlPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UrlPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}
