use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::{Url, form_urlencoded};

/// A request body, encoded when the request is sent.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Bytes(Bytes),
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

impl Body {
    pub fn is_empty(&self) -> bool { matches!(self, Self::Empty) }

    /// Encoded bytes and the content type they imply, if any.
    pub fn encode(&self) -> Result<(Option<&'static str>, Bytes)> {
        Ok(match self {
            Self::Empty => (None, Bytes::new()),
            Self::Bytes(bytes) => (None, bytes.clone()),
            Self::Form(pairs) => {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish();
                (Some("application/x-www-form-urlencoded"), Bytes::from(encoded))
            }
            Self::Json(value) => (Some("application/json"), Bytes::from(serde_json::to_vec(value)?)),
        })
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self { Self::Bytes(Bytes::copy_from_slice(text.as_bytes())) }
}

impl From<String> for Body {
    fn from(text: String) -> Self { Self::Bytes(Bytes::from(text)) }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self { Self::Bytes(Bytes::from(bytes)) }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self { Self::Json(value) }
}

pub(crate) fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::InvalidHeader {
        name:   name.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader {
        name:   name.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|source| Error::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

#[derive(Clone, Debug)]
pub struct Request {
    pub method:           Method,
    pub url:              Url,
    pub headers:          HeaderMap,
    pub body:             Body,
    pub timeout:          Option<Duration>,
    pub follow_redirects: bool,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Result<Self> {
        Ok(Self::from_url(method, parse_url(url)?))
    }

    pub fn from_url(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: Body::Empty,
            timeout: None,
            follow_redirects: true,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        self.headers.insert(header_name(name)?, header_value(name, value)?);
        Ok(self)
    }

    /// Append query parameters to the URL.
    pub fn query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = params.into_iter().peekable();
        if params.peek().is_some() {
            self.url.query_pairs_mut().extend_pairs(params);
        }
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn basic_auth(mut self, username: &str, password: Option<&str>) -> Self {
        self.headers.insert(header::AUTHORIZATION, basic_auth_value(username, password));
        self
    }
}

pub(crate) fn basic_auth_value(username: &str, password: Option<&str>) -> HeaderValue {
    let credentials = format!("{username}:{}", password.unwrap_or_default());
    let mut value = HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(credentials)))
        .unwrap_or_else(|_| HeaderValue::from_static("Basic"));
    value.set_sensitive(true);
    value
}

/// A fully buffered response.
#[derive(Clone, Debug)]
pub struct Response {
    pub status:  StatusCode,
    pub url:     Url,
    pub headers: HeaderMap,
    pub body:    Bytes,
    from_cache:  bool,
}

impl Response {
    pub fn new(status: StatusCode, url: Url, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            url,
            headers,
            body,
            from_cache: false,
        }
    }

    /// Whether this response was served from an HTTP cache without contacting the server.
    pub fn from_cache(&self) -> bool { self.from_cache }

    pub(crate) fn mark_from_cache(mut self) -> Self {
        self.from_cache = true;
        self
    }

    pub fn is_success(&self) -> bool { self.status.is_success() }

    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `Content-Type` without parameters.
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE)
            .map(|ct| ct.split(';').next().unwrap_or_default().trim())
    }

    pub fn text(&self) -> String { String::from_utf8_lossy(&self.body).into_owned() }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> { Ok(serde_json::from_slice(&self.body)?) }
}
