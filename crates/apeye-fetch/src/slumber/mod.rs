//! A [`Url`] for REST APIs: requests and responses go through a
//! [`SerializerRegistry`], and error statuses become typed errors.

mod serializer;

pub use serializer::{JsonSerializer, Serializer, SerializerRegistry, YamlSerializer};

use crate::http::{Body, HeaderMap, Method, Request, Response, Session, parse_url};
use crate::{Error, Result};
use apeye_url::{IntoSegment, Url};
use reqwest::header::{ACCEPT, ALLOW, CONTENT_TYPE, HeaderValue};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::{Deref, Div};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct SlumberOptions {
    format:          String,
    append_slash:    bool,
    session:         Option<Session>,
    serializer:      Option<SerializerRegistry>,
    timeout:         Option<Duration>,
    allow_redirects: bool,
    auth:            Option<(String, String)>,
}

impl Default for SlumberOptions {
    fn default() -> Self {
        Self {
            format:          "json".to_string(),
            append_slash:    true,
            session:         None,
            serializer:      None,
            timeout:         None,
            allow_redirects: true,
            auth:            None,
        }
    }
}

impl SlumberOptions {
    pub fn new() -> Self { Self::default() }

    /// Default serializer format when no registry is given.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn append_slash(mut self, append_slash: bool) -> Self {
        self.append_slash = append_slash;
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn serializer(mut self, serializer: SerializerRegistry) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn allow_redirects(mut self, allow_redirects: bool) -> Self {
        self.allow_redirects = allow_redirects;
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }
}

/// State shared by a URL and every child made from it.
#[derive(Clone)]
struct Store {
    format:       String,
    append_slash: bool,
    session:      Session,
    serializer:   Arc<SerializerRegistry>,
}

#[derive(Clone)]
pub struct SlumberUrl {
    url:             Url,
    store:           Store,
    timeout:         Option<Duration>,
    allow_redirects: bool,
}

impl SlumberUrl {
    pub fn new(url: impl Into<Url>) -> Result<Self> { Self::with_options(url, SlumberOptions::new()) }

    pub fn with_options(url: impl Into<Url>, options: SlumberOptions) -> Result<Self> {
        let serializer = options
            .serializer
            .unwrap_or_else(|| SerializerRegistry::new(options.format.as_str()));
        let mut session = match options.session {
            Some(session) => session,
            None => Session::new()?,
        };
        if let Some((username, password)) = &options.auth {
            session = session.basic_auth(username, Some(password.as_str()));
        }

        Ok(Self {
            url:             url.into(),
            store:           Store {
                format: options.format,
                append_slash: options.append_slash,
                session,
                serializer: Arc::new(serializer),
            },
            timeout:         options.timeout,
            allow_redirects: options.allow_redirects,
        })
    }

    pub fn format(&self) -> &str { &self.store.format }

    pub fn append_slash(&self) -> bool { self.store.append_slash }

    pub fn session(&self) -> &Session { &self.store.session }

    pub fn serializer(&self) -> &SerializerRegistry { &self.store.serializer }

    pub fn timeout(&self) -> Option<Duration> { self.timeout }

    pub fn allow_redirects(&self) -> bool { self.allow_redirects }

    /// The request target: the URL with a `/` after its path when
    /// `append_slash` is set.
    pub fn url(&self) -> String {
        let mut url = self.url.base_url().to_string();
        if self.store.append_slash && !url.ends_with('/') {
            url.push('/');
        }
        if !self.url.query.is_empty() {
            url.push('?');
            url.push_str(&self.url.query.encode());
        }
        url
    }

    pub fn join(&self, segment: impl IntoSegment) -> Self {
        Self {
            url:             self.url.join(segment),
            store:           self.store.clone(),
            timeout:         self.timeout,
            allow_redirects: self.allow_redirects,
        }
    }

    pub fn parent(&self) -> Self {
        Self {
            url: self.url.parent(),
            ..self.clone()
        }
    }

    async fn request(&self, method: Method, data: Option<&Value>, params: &[(&str, &str)]) -> Result<Response> {
        let serializer = self.store.serializer.get_serializer(None)?;
        let content_type = HeaderValue::from_static(serializer.content_type());

        let mut request = Request::from_url(method, parse_url(&self.url())?)
            .query(params.iter().copied())
            .follow_redirects(self.allow_redirects);
        request.headers.insert(ACCEPT, content_type.clone());
        request.headers.insert(CONTENT_TYPE, content_type);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        if let Some(data) = data {
            request = request.body(Body::from(serializer.dumps(data)?));
        }

        let response = self.store.session.send(request).await?;
        let status = response.status.as_u16();
        let url = response.url.to_string();
        match status {
            404 => Err(Error::HttpNotFound {
                url,
                content: response.body,
            }),
            400..=499 => Err(Error::HttpClient {
                status,
                url,
                content: response.body,
            }),
            500..=599 => Err(Error::HttpServer {
                status,
                url,
                content: response.body,
            }),
            _ => Ok(response),
        }
    }

    /// Decode a response body with the serializer for its content type.
    ///
    /// Bodies that cannot be decoded come back as a string.
    fn process(&self, response: &Response) -> Value {
        if !response.is_success() {
            return Value::Null;
        }
        if matches!(response.status.as_u16(), 204 | 205) {
            return Value::Object(Map::new());
        }

        let text = response.text();
        let Some(content_type) = response.content_type().filter(|_| !response.body.is_empty()) else {
            return Value::String(text);
        };
        match self.store.serializer.get_serializer_for_content_type(content_type) {
            Ok(serializer) => serializer.loads(&text).unwrap_or_else(|err| {
                debug!(url = %response.url, error = %err, "returning undecodable body as text");
                Value::String(text)
            }),
            Err(_) => Value::String(text),
        }
    }

    pub async fn get(&self, params: &[(&str, &str)]) -> Result<Value> {
        let response = self.request(Method::GET, None, params).await?;
        Ok(self.process(&response))
    }

    pub async fn post(&self, data: Option<&Value>, params: &[(&str, &str)]) -> Result<Value> {
        let response = self.request(Method::POST, data, params).await?;
        Ok(self.process(&response))
    }

    pub async fn put(&self, data: Option<&Value>, params: &[(&str, &str)]) -> Result<Value> {
        let response = self.request(Method::PUT, data, params).await?;
        Ok(self.process(&response))
    }

    pub async fn patch(&self, data: Option<&Value>, params: &[(&str, &str)]) -> Result<Value> {
        let response = self.request(Method::PATCH, data, params).await?;
        Ok(self.process(&response))
    }

    /// Whether the server answered 2xx.
    pub async fn delete(&self, params: &[(&str, &str)]) -> Result<bool> {
        let response = self.request(Method::DELETE, None, params).await?;
        Ok(response.is_success())
    }

    /// The `Allow` header of an OPTIONS response, or `""`.
    pub async fn options(&self) -> Result<String> {
        let request = Request::new(Method::OPTIONS, &self.url.to_string())?;
        let response = self.store.session.send(request).await?;
        Ok(response.header(ALLOW).unwrap_or_default().to_string())
    }

    /// Headers of a HEAD response.
    pub async fn head(&self) -> Result<HeaderMap> {
        let request = Request::new(Method::HEAD, &self.url.to_string())?.follow_redirects(false);
        Ok(self.store.session.send(request).await?.headers)
    }
}

impl Deref for SlumberUrl {
    type Target = Url;

    fn deref(&self) -> &Url { &self.url }
}

impl<S: IntoSegment> Div<S> for &SlumberUrl {
    type Output = SlumberUrl;

    fn div(self, segment: S) -> SlumberUrl { self.join(segment) }
}

impl<S: IntoSegment> Div<S> for SlumberUrl {
    type Output = SlumberUrl;

    fn div(self, segment: S) -> SlumberUrl { self.join(segment) }
}

impl fmt::Display for SlumberUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(&self.url, f) }
}

impl fmt::Debug for SlumberUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "SlumberUrl('{}')", self.url) }
}
