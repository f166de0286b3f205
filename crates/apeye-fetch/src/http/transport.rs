use super::{Request, Response};
use crate::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::sync::Arc;
use tracing::debug;

const MAX_REDIRECTS: usize = 30;

/// Sends one request and buffers the response.
///
/// Adapters such as [`CacheAdapter`](crate::CacheAdapter) wrap another
/// transport and are transports themselves.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: Request) -> Result<Response> { (**self).send(request).await }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, request: Request) -> Result<Response> { (**self).send(request).await }
}

/// Production transport on `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    follow:    reqwest::Client,
    no_follow: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Ok(Self {
            follow:    reqwest::Client::builder()
                .redirect(Policy::limited(MAX_REDIRECTS))
                .build()?,
            no_follow: reqwest::Client::builder().redirect(Policy::none()).build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let client = if request.follow_redirects {
            &self.follow
        } else {
            &self.no_follow
        };

        let (content_type, body) = request.body.encode()?;
        let mut builder = client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(content_type) = content_type {
            if !request.headers.contains_key(CONTENT_TYPE) {
                builder = builder.header(CONTENT_TYPE, content_type);
            }
        }
        if !body.is_empty() {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        debug!(method = %request.method, %url, status = status.as_u16(), bytes = body.len(), "received response");

        Ok(Response::new(status, url, headers, body))
    }
}
