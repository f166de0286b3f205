use super::message::{basic_auth_value, header_name, header_value};
use super::{Body, ReqwestTransport, Request, Response, Transport};
use crate::Result;
use reqwest::Method;
use reqwest::header::{self, HeaderMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A cloneable handle over a shared [`Transport`], with default headers
/// and credentials applied to every request.
#[derive(Clone)]
pub struct Session {
    transport: Arc<dyn Transport>,
    headers:   HeaderMap,
    timeout:   Option<Duration>,
}

impl Session {
    /// A session on a fresh [`ReqwestTransport`].
    pub fn new() -> Result<Self> { Ok(Self::with_transport(ReqwestTransport::new()?)) }

    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            headers:   HeaderMap::new(),
            timeout:   None,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        self.headers.insert(header_name(name)?, header_value(name, value)?);
        Ok(self)
    }

    pub fn basic_auth(mut self, username: &str, password: Option<&str>) -> Self {
        self.headers.insert(header::AUTHORIZATION, basic_auth_value(username, password));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn transport(&self) -> &Arc<dyn Transport> { &self.transport }

    /// Send `request`, filling in session headers the request does not set.
    pub async fn send(&self, mut request: Request) -> Result<Response> {
        for (name, value) in &self.headers {
            if !request.headers.contains_key(name) {
                request.headers.insert(name.clone(), value.clone());
            }
        }
        if request.timeout.is_none() {
            request.timeout = self.timeout;
        }
        self.transport.send(request).await
    }

    pub async fn request(&self, method: Method, url: &str, body: Body) -> Result<Response> {
        self.send(Request::new(method, url)?.body(body)).await
    }

    pub async fn get(&self, url: &str) -> Result<Response> { self.request(Method::GET, url, Body::Empty).await }

    /// HEAD without following redirects.
    pub async fn head(&self, url: &str) -> Result<Response> {
        self.send(Request::new(Method::HEAD, url)?.follow_redirects(false)).await
    }

    pub async fn options(&self, url: &str) -> Result<Response> {
        self.request(Method::OPTIONS, url, Body::Empty).await
    }

    pub async fn post(&self, url: &str, body: impl Into<Body>) -> Result<Response> {
        self.request(Method::POST, url, body.into()).await
    }

    pub async fn put(&self, url: &str, body: impl Into<Body>) -> Result<Response> {
        self.request(Method::PUT, url, body.into()).await
    }

    pub async fn patch(&self, url: &str, body: impl Into<Body>) -> Result<Response> {
        self.request(Method::PATCH, url, body.into()).await
    }

    pub async fn delete(&self, url: &str) -> Result<Response> {
        self.request(Method::DELETE, url, Body::Empty).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
