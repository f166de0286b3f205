use super::httpdate;
use crate::http::{HeaderMap, HeaderValue, Response};
use chrono::Utc;
use reqwest::header::{CACHE_CONTROL, EXPIRES, WARNING};
use std::time::Duration;

/// Rewrites the headers of a fresh response before the controller decides
/// whether to store it.
pub trait Heuristic: Send + Sync {
    /// Headers to set on `response`, replacing existing values.
    fn update_headers(&self, response: &Response) -> HeaderMap;

    /// A `Warning` header value to attach, if any.
    fn warning(&self, _response: &Response) -> Option<String> { None }

    fn apply(&self, response: &mut Response) {
        let updated = self.update_headers(response);
        if updated.is_empty() {
            return;
        }
        for (name, value) in &updated {
            response.headers.insert(name.clone(), value.clone());
        }
        if let Some(warning) = self.warning(response) {
            if let Ok(value) = HeaderValue::from_str(&warning) {
                response.headers.insert(WARNING, value);
            }
        }
    }
}

/// Treat every response as public and fresh for `delta` from now.
#[derive(Debug, Clone, Copy)]
pub struct ExpiresAfter {
    delta: Duration,
}

impl ExpiresAfter {
    pub fn new(delta: Duration) -> Self { Self { delta } }

    pub fn days(days: u64) -> Self { Self::new(Duration::from_secs(days * 86_400)) }

    pub fn delta(&self) -> Duration { self.delta }
}

impl Heuristic for ExpiresAfter {
    fn update_headers(&self, _response: &Response) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let delta = chrono::Duration::from_std(self.delta).unwrap_or(chrono::Duration::MAX);
        let expires = Utc::now().checked_add_signed(delta).unwrap_or(chrono::DateTime::<Utc>::MAX_UTC);

        if let Ok(value) = HeaderValue::from_str(&httpdate::format(expires)) {
            headers.insert(EXPIRES, value);
        }
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("public"));
        headers
    }

    fn warning(&self, _response: &Response) -> Option<String> {
        Some(format!(
            "110 - Automatically cached for {}s. Response might be stale",
            self.delta.as_secs()
        ))
    }
}
