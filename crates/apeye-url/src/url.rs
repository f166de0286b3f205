use crate::{Domain, Error, Query, Result, UrlPath};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Div;
use std::str::FromStr;

static HAS_AUTHORITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z\-.]+:)?//").expect("valid authority regex"));

/// A URL that behaves like a pure path.
///
/// Equality and hashing only consider scheme, netloc and path. Use
/// [`Url::strict_eq`] to also compare query and fragment.
#[derive(Clone, Default)]
pub struct Url {
    pub scheme:   String,
    pub netloc:   String,
    pub path:     UrlPath,
    pub query:    Query,
    pub fragment: Option<String>,
}

impl Url {
    /// Input without a `scheme://` or `//` prefix is read as if it started
    /// with `//`, so `"bbc.co.uk/news"` has the netloc `bbc.co.uk`.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (scheme, rest) = match HAS_AUTHORITY.captures(input) {
            Some(caps) => {
                let scheme = caps
                    .get(1)
                    .map(|m| m.as_str().trim_end_matches(':').to_ascii_lowercase())
                    .unwrap_or_default();
                let end = caps.get(0).map_or(0, |m| m.end());
                (scheme, &input[end..])
            }
            None => (String::new(), input),
        };

        let (rest, fragment) = match rest.split_once('#') {
            Some((r, f)) => (r, (!f.is_empty()).then(|| f.to_string())),
            None => (rest, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((r, q)) => (r, Query::parse(q)),
            None => (rest, Query::new()),
        };
        let (netloc, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };

        Self {
            scheme,
            netloc: netloc.to_string(),
            path: UrlPath::new(path),
            query,
            fragment,
        }
    }

    /// Build a URL from its parts. A path that is not rooted gets a leading `/`.
    pub fn from_parts(
        scheme: impl Into<String>,
        netloc: impl Into<String>,
        path: impl Into<UrlPath>,
    ) -> Self {
        Self {
            scheme:   scheme.into(),
            netloc:   netloc.into(),
            path:     path.into().rooted(),
            query:    Query::new(),
            fragment: None,
        }
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn with_fragment(mut self, fragment: Option<String>) -> Self {
        self.fragment = fragment.filter(|f| !f.is_empty());
        self
    }

    /// Scheme, netloc and path, without query or fragment.
    pub fn base_url(&self) -> Self {
        Self {
            scheme:   self.scheme.clone(),
            netloc:   self.netloc.clone(),
            path:     self.path.clone(),
            query:    Query::new(),
            fragment: None,
        }
    }

    pub fn fspath(&self) -> String { format!("{}{}", self.netloc, self.path) }

    pub fn strict_eq(&self, other: &Self) -> bool {
        self == other && self.query == other.query && self.fragment == other.fragment
    }

    /// Child URL for `segment`. Query and fragment are not carried over.
    pub fn join(&self, segment: impl IntoSegment) -> Self {
        let segment = segment.into_segment();
        Self::from_parts(&self.scheme, &self.netloc, self.path.join(&segment))
    }

    /// Join each of `parts` in turn. Query and fragment are taken from the last part.
    pub fn joinurl<I, S>(&self, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = self.path.clone();
        let mut query = Query::new();
        let mut fragment = None;

        for part in parts {
            let part = part.as_ref();
            let (part, frag) = match part.split_once('#') {
                Some((p, f)) => (p, (!f.is_empty()).then(|| f.to_string())),
                None => (part, None),
            };
            let (part, q) = match part.split_once('?') {
                Some((p, q)) => (p, Query::parse(q)),
                None => (part, Query::new()),
            };
            path = path.join(part);
            query = q;
            fragment = frag;
        }

        Self::from_parts(&self.scheme, &self.netloc, path)
            .with_query(query)
            .with_fragment(fragment)
    }

    pub fn name(&self) -> &str { self.path.name() }

    pub fn suffix(&self) -> &str { self.path.suffix() }

    pub fn suffixes(&self) -> Vec<String> { self.path.suffixes() }

    pub fn stem(&self) -> &str { self.path.stem() }

    /// With `inherit`, query and fragment are kept.
    pub fn with_name(&self, name: &str, inherit: bool) -> Result<Self> {
        let path = self.path.with_name(name)?;
        Ok(self.derive(path, inherit))
    }

    /// With `inherit`, query and fragment are kept.
    pub fn with_suffix(&self, suffix: &str, inherit: bool) -> Result<Self> {
        let path = self.path.with_suffix(suffix)?;
        Ok(self.derive(path, inherit))
    }

    fn derive(&self, path: UrlPath, inherit: bool) -> Self {
        let url = Self::from_parts(&self.scheme, &self.netloc, path);
        if inherit {
            url.with_query(self.query.clone())
                .with_fragment(self.fragment.clone())
        } else {
            url
        }
    }

    pub fn parent(&self) -> Self { Self::from_parts(&self.scheme, &self.netloc, self.path.parent()) }

    pub fn parents(&self) -> Vec<Self> {
        self.path
            .parents()
            .into_iter()
            .map(|p| Self::from_parts(&self.scheme, &self.netloc, p))
            .collect()
    }

    pub fn domain(&self) -> Domain { Domain::extract(&self.netloc) }

    pub fn fqdn(&self) -> String { self.domain().fqdn() }

    pub fn port(&self) -> Option<u16> {
        let host_port = self.netloc.rsplit('@').next().unwrap_or("");
        let after_host = match host_port.rfind(']') {
            Some(i) => &host_port[i + 1..],
            None => host_port,
        };
        after_host.rsplit_once(':')?.1.parse().ok()
    }

    /// Scheme, subdomain, domain, suffix, then each path segment.
    pub fn parts(&self) -> Vec<String> {
        let domain = self.domain();
        [self.scheme.clone(), domain.subdomain, domain.domain, domain.suffix]
            .into_iter()
            .chain(self.path.segments().iter().cloned())
            .collect()
    }

    /// The path of `self` below `other`.
    ///
    /// Netlocs are compared case-insensitively, and only when `other` has one.
    pub fn relative_to(&self, other: impl Into<RelativeBase>) -> Result<UrlPath> {
        let other = match other.into() {
            RelativeBase::Path(path) => {
                if !path.is_absolute() {
                    return Err(Error::RelativePath);
                }
                Self::from_parts("", "", path)
            }
            RelativeBase::Url(url) => url,
        };

        if !other.netloc.is_empty() && !self.netloc.eq_ignore_ascii_case(&other.netloc) {
            return Err(Error::NotRelative {
                path: format!("{self:?}"),
                base: format!("{other:?}"),
            });
        }

        self.path.rooted().relative_to(&other.path.rooted())
    }

    fn sort_key(&self) -> (&str, Domain, u16, &[String]) {
        (&self.scheme, self.domain(), self.port().unwrap_or(0), self.path.segments())
    }
}

/// The right-hand side of [`Url::relative_to`]: strings are parsed as URLs.
pub enum RelativeBase {
    Url(Url),
    Path(UrlPath),
}

impl From<&str> for RelativeBase {
    fn from(s: &str) -> Self { Self::Url(Url::parse(s)) }
}

impl From<&Url> for RelativeBase {
    fn from(url: &Url) -> Self { Self::Url(url.clone()) }
}

impl From<Url> for RelativeBase {
    fn from(url: Url) -> Self { Self::Url(url) }
}

impl From<UrlPath> for RelativeBase {
    fn from(path: UrlPath) -> Self { Self::Path(path) }
}

impl From<&UrlPath> for RelativeBase {
    fn from(path: &UrlPath) -> Self { Self::Path(path.clone()) }
}

/// Anything that can be joined onto a [`Url`] with `/`.
pub trait IntoSegment {
    fn into_segment(self) -> String;
}

impl IntoSegment for &str {
    fn into_segment(self) -> String { self.to_string() }
}

impl IntoSegment for String {
    fn into_segment(self) -> String { self }
}

impl IntoSegment for &String {
    fn into_segment(self) -> String { self.clone() }
}

impl IntoSegment for &UrlPath {
    fn into_segment(self) -> String { self.to_string() }
}

impl IntoSegment for UrlPath {
    fn into_segment(self) -> String { self.to_string() }
}

impl IntoSegment for &Url {
    fn into_segment(self) -> String { self.fspath() }
}

impl IntoSegment for Url {
    fn into_segment(self) -> String { self.fspath() }
}

macro_rules! int_segment {
    ($($t:ty),*) => {
        $(impl IntoSegment for $t {
            fn into_segment(self) -> String { self.to_string() }
        })*
    };
}

int_segment!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl<S: IntoSegment> Div<S> for &Url {
    type Output = Url;

    fn div(self, rhs: S) -> Url { self.join(rhs) }
}

impl<S: IntoSegment> Div<S> for Url {
    type Output = Url;

    fn div(self, rhs: S) -> Url { self.join(rhs) }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scheme.is_empty() {
            write!(f, "{}{}", self.netloc, self.path)?;
        } else {
            write!(f, "{}://{}{}", self.scheme, self.netloc, self.path)?;
        }
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Url('{self}')") }
}

impl PartialEq for Url {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme && self.netloc == other.netloc && self.path == other.path
    }
}

impl Eq for Url {}

impl Hash for Url {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scheme.hash(state);
        self.netloc.hash(state);
        self.path.hash(state);
    }
}

impl Ord for Url {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.netloc.cmp(&other.netloc))
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for Url {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl FromStr for Url {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> { Ok(Self::parse(s)) }
}

impl From<&str> for Url {
    fn from(s: &str) -> Self { Self::parse(s) }
}

impl From<String> for Url {
    fn from(s: String) -> Self { Self::parse(&s) }
}

impl Serialize for Url {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Url {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
