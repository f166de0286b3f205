use crate::http::{Body, Method, Request, Response, Session, StatusCode, parse_url};
use crate::{Error, Result};
use apeye_url::{IntoSegment, Query, Url};
use std::fmt;
use std::ops::{Deref, Div};
use tracing::debug;

/// A [`Url`] that can issue requests through a [`Session`].
///
/// Children made with `/`, [`join`](Self::join) or [`parent`](Self::parent)
/// share the session.
#[derive(Clone)]
pub struct RequestsUrl {
    url:      Url,
    session:  Session,
    trailing: bool,
}

impl RequestsUrl {
    /// Bind `url` to a new session on the default transport.
    pub fn new(url: impl Into<Url>) -> Result<Self> { Ok(Self::with_session(url, Session::new()?)) }

    pub fn with_session(url: impl Into<Url>, session: Session) -> Self {
        Self {
            url: url.into(),
            session,
            trailing: false,
        }
    }

    /// The same URL, rendered and requested with a trailing `/`.
    pub fn trailing(mut self) -> Self {
        self.trailing = true;
        self
    }

    pub fn is_trailing(&self) -> bool { self.trailing }

    pub fn url(&self) -> &Url { &self.url }

    pub fn session(&self) -> &Session { &self.session }

    pub fn set_session(&mut self, session: Session) { self.session = session; }

    fn derive(&self, url: Url) -> Self {
        Self {
            url,
            session: self.session.clone(),
            trailing: self.trailing,
        }
    }

    pub fn join(&self, segment: impl IntoSegment) -> Self { self.derive(self.url.join(segment)) }

    pub fn parent(&self) -> Self { self.derive(self.url.parent()) }

    fn target(&self) -> Result<url::Url> {
        let mut target = self.url.base_url().to_string();
        if self.trailing {
            target.push('/');
        }
        parse_url(&target)
    }

    fn request(&self, method: Method) -> Result<Request> { Ok(Request::from_url(method, self.target()?)) }

    /// GET the URL. With no `params`, the URL's own query is sent.
    pub async fn get(&self, params: Option<&Query>) -> Result<Response> {
        let params = match params {
            Some(params) => params,
            None => &self.url.query,
        };
        let request = self.request(Method::GET)?.query(params.pairs());
        self.session.send(request).await
    }

    pub async fn options(&self) -> Result<Response> { self.session.send(self.request(Method::OPTIONS)?).await }

    /// HEAD without following redirects.
    pub async fn head(&self) -> Result<Response> {
        self.session
            .send(self.request(Method::HEAD)?.follow_redirects(false))
            .await
    }

    pub async fn post(&self, body: impl Into<Body>) -> Result<Response> {
        self.session.send(self.request(Method::POST)?.body(body)).await
    }

    pub async fn put(&self, body: impl Into<Body>) -> Result<Response> {
        self.session.send(self.request(Method::PUT)?.body(body)).await
    }

    pub async fn patch(&self, body: impl Into<Body>) -> Result<Response> {
        self.session.send(self.request(Method::PATCH)?.body(body)).await
    }

    pub async fn delete(&self) -> Result<Response> { self.session.send(self.request(Method::DELETE)?).await }

    /// Follow redirects with HEAD and return the final URL on the same session.
    pub async fn resolve(&self) -> Result<Self> {
        let response = self
            .session
            .send(self.request(Method::HEAD)?.follow_redirects(true))
            .await?;

        if response.status != StatusCode::OK {
            return Err(Error::Resolve {
                url:    format!("{:?}", self.url),
                status: response.status.as_u16(),
            });
        }

        debug!(from = %self.url, to = %response.url, "resolved URL");
        Ok(Self {
            url: Url::parse(response.url.as_str()),
            session: self.session.clone(),
            trailing: false,
        })
    }
}

impl Deref for RequestsUrl {
    type Target = Url;

    fn deref(&self) -> &Url { &self.url }
}

impl<S: IntoSegment> Div<S> for &RequestsUrl {
    type Output = RequestsUrl;

    fn div(self, segment: S) -> RequestsUrl { self.join(segment) }
}

impl<S: IntoSegment> Div<S> for RequestsUrl {
    type Output = RequestsUrl;

    fn div(self, segment: S) -> RequestsUrl { self.join(segment) }
}

impl PartialEq for RequestsUrl {
    fn eq(&self, other: &Self) -> bool { self.url == other.url && self.trailing == other.trailing }
}

impl fmt::Display for RequestsUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)?;
        if self.trailing {
            f.write_str("/")?;
        }
        Ok(())
    }
}

impl fmt::Debug for RequestsUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.trailing { "TrailingRequestsUrl" } else { "RequestsUrl" };
        write!(f, "{kind}('{self}')")
    }
}
