use super::{CacheController, Heuristic};
use crate::Result;
use crate::http::{Method, Request, Response, StatusCode, Transport};
use crate::rate::RateLimiter;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// A [`Transport`] that answers `GET`s from a [`CacheController`] and
/// stores what the inner transport returns.
pub struct CacheAdapter<T> {
    inner:      T,
    controller: CacheController,
    heuristic:  Option<Arc<dyn Heuristic>>,
}

impl<T: Transport> CacheAdapter<T> {
    pub fn new(inner: T, controller: CacheController) -> Self {
        Self {
            inner,
            controller,
            heuristic: None,
        }
    }

    pub fn heuristic(mut self, heuristic: impl Heuristic + 'static) -> Self {
        self.heuristic = Some(Arc::new(heuristic));
        self
    }

    pub fn controller(&self) -> &CacheController { &self.controller }

    pub fn inner(&self) -> &T { &self.inner }

    fn is_cacheable(request: &Request) -> bool { request.method == Method::GET }

    fn is_invalidating(request: &Request) -> bool {
        matches!(request.method, Method::PUT | Method::PATCH | Method::DELETE)
    }

    /// Storage failures degrade to a miss rather than failing the request.
    fn lookup(&self, request: &Request) -> Option<Response> {
        self.controller
            .cached_response(request)
            .unwrap_or_else(|err| {
                warn!(url = %request.url, error = %err, "HTTP cache lookup failed");
                None
            })
    }

    fn build_response(&self, request: &Request, mut response: Response) -> Response {
        if Self::is_cacheable(request) {
            if let Some(heuristic) = &self.heuristic {
                heuristic.apply(&mut response);
            }

            if response.status == StatusCode::NOT_MODIFIED {
                match self.controller.update_cached_response(request, response.clone()) {
                    Ok(updated) => response = updated,
                    Err(err) => warn!(url = %request.url, error = %err, "failed to revalidate cached response"),
                }
            } else if let Err(err) = self.controller.cache_response(request, &response) {
                warn!(url = %request.url, error = %err, "failed to store response");
            }
        }

        if Self::is_invalidating(request) && response.is_success() {
            if let Err(err) = self.controller.invalidate(&request.url) {
                warn!(url = %request.url, error = %err, "failed to invalidate cached response");
            }
        }
        response
    }
}

#[async_trait]
impl<T: Transport> Transport for CacheAdapter<T> {
    async fn send(&self, mut request: Request) -> Result<Response> {
        if Self::is_cacheable(&request) {
            if let Some(hit) = self.lookup(&request) {
                return Ok(hit);
            }
            match self.controller.conditional_headers(&request) {
                Ok(conditional) => request.headers.extend(conditional),
                Err(err) => warn!(url = %request.url, error = %err, "failed to read validators"),
            }
        }

        debug!(method = %request.method, url = %request.url, "forwarding request");
        let response = self.inner.send(request.clone()).await?;
        Ok(self.build_response(&request, response))
    }
}

/// Waits on a [`RateLimiter`] before each request.
pub struct RateLimitedTransport<T> {
    inner:   T,
    limiter: RateLimiter,
}

impl<T> RateLimitedTransport<T> {
    pub fn new(inner: T, limiter: RateLimiter) -> Self { Self { inner, limiter } }

    pub fn limiter(&self) -> &RateLimiter { &self.limiter }
}

#[async_trait]
impl<T: Transport> Transport for RateLimitedTransport<T> {
    async fn send(&self, request: Request) -> Result<Response> {
        self.limiter.wait().await;
        self.inner.send(request).await
    }
}

/// Cache hits are served immediately; only requests that reach the
/// network are rate limited.
pub type RateLimitAdapter<T> = CacheAdapter<RateLimitedTransport<T>>;

impl<T: Transport> CacheAdapter<RateLimitedTransport<T>> {
    pub fn rate_limited(inner: T, limiter: RateLimiter, controller: CacheController) -> Self {
        Self::new(RateLimitedTransport::new(inner, limiter), controller)
    }
}
