use super::{CacheControl, CacheStorage, CachedResponse, httpdate};
use crate::Result;
use crate::http::{HeaderMap, HeaderValue, Method, Request, Response};
use chrono::Utc;
use reqwest::header::{CONTENT_LENGTH, DATE, ETAG, EXPIRES, IF_MODIFIED_SINCE, IF_NONE_MATCH, VARY};
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub const CACHEABLE_STATUSES: [u16; 5] = [200, 203, 300, 301, 308];
const PERMANENT_REDIRECTS: [u16; 2] = [301, 308];

/// Decides when a stored response may answer a request and when a fresh
/// response may be stored.
#[derive(Clone)]
pub struct CacheController {
    storage:  Arc<dyn CacheStorage>,
    statuses: Vec<u16>,
}

impl CacheController {
    pub fn new(storage: impl CacheStorage + 'static) -> Self { Self::with_storage(Arc::new(storage)) }

    pub fn with_storage(storage: Arc<dyn CacheStorage>) -> Self {
        Self {
            storage,
            statuses: CACHEABLE_STATUSES.to_vec(),
        }
    }

    pub fn cacheable_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> { &self.storage }

    /// The URL without its fragment.
    pub fn cache_key(url: &Url) -> String {
        let mut url = url.clone();
        url.set_fragment(None);
        url.into()
    }

    /// A fresh stored response for `request`, marked as from the cache.
    ///
    /// Stale entries without an `ETag` are deleted; stale entries with
    /// one are kept for revalidation.
    pub fn cached_response(&self, request: &Request) -> Result<Option<Response>> {
        let key = Self::cache_key(&request.url);
        let request_cc = CacheControl::from_headers(&request.headers);
        if request_cc.no_cache || request_cc.max_age == Some(0) {
            debug!(%key, "request asked to bypass the cache");
            return Ok(None);
        }

        let Some(entry) = self.storage.get(&key)? else {
            return Ok(None);
        };
        if !vary_matches(&entry, &request.headers) {
            debug!(%key, "stored response varies from request");
            return Ok(None);
        }

        if PERMANENT_REDIRECTS.contains(&entry.status) {
            debug!(%key, status = entry.status, "serving permanent redirect from cache");
            return Ok(Some(entry.to_response()?.mark_from_cache()));
        }

        let Some(date) = entry.header("date").and_then(httpdate::parse) else {
            if entry.header("etag").is_none() {
                self.storage.delete(&key)?;
            }
            debug!(%key, "stored response has no usable Date");
            return Ok(None);
        };

        let mut current_age = (Utc::now() - date).num_seconds().max(0) as u64;
        let response_cc = entry
            .header("cache-control")
            .map(CacheControl::parse)
            .unwrap_or_default();

        let mut freshness = match response_cc.max_age {
            Some(max_age) => max_age,
            None => entry
                .header("expires")
                .and_then(httpdate::parse)
                .map(|expires| (expires - date).num_seconds().max(0) as u64)
                .unwrap_or(0),
        };
        if let Some(max_age) = request_cc.max_age {
            freshness = max_age;
        }
        if let Some(min_fresh) = request_cc.min_fresh {
            current_age += min_fresh;
        }

        if freshness > current_age {
            debug!(%key, freshness, current_age, "cache hit");
            return Ok(Some(entry.to_response()?.mark_from_cache()));
        }

        if entry.header("etag").is_none() {
            debug!(%key, "deleting stale entry without ETag");
            self.storage.delete(&key)?;
        } else {
            debug!(%key, "stale entry kept for revalidation");
        }
        Ok(None)
    }

    /// Validators for revalidating a stored response.
    pub fn conditional_headers(&self, request: &Request) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let Some(entry) = self.storage.get(&Self::cache_key(&request.url))? else {
            return Ok(headers);
        };

        if let Some(etag) = entry.header("etag").and_then(|v| HeaderValue::from_str(v).ok()) {
            headers.insert(IF_NONE_MATCH, etag);
        }
        if let Some(modified) = entry
            .header("last-modified")
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            headers.insert(IF_MODIFIED_SINCE, modified);
        }
        Ok(headers)
    }

    /// Store `response` if its status and headers allow. Returns whether it was stored.
    pub fn cache_response(&self, request: &Request, response: &Response) -> Result<bool> {
        let status = response.status.as_u16();
        if !self.statuses.contains(&status) {
            return Ok(false);
        }

        let headers = &response.headers;
        if let Some(length) = response
            .header(CONTENT_LENGTH)
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            if request.method != Method::HEAD && length != response.body.len() {
                debug!(url = %response.url, "body length disagrees with Content-Length, not caching");
                return Ok(false);
            }
        }

        let key = Self::cache_key(&request.url);
        let request_cc = CacheControl::from_headers(&request.headers);
        let response_cc = CacheControl::from_headers(headers);
        if request_cc.no_store || response_cc.no_store {
            self.storage.delete(&key)?;
            debug!(%key, "no-store, not caching");
            return Ok(false);
        }
        if response.header(VARY).is_some_and(|v| v.contains('*')) {
            return Ok(false);
        }

        let mut entry = CachedResponse::from_response(response);
        entry.vary = vary_values(response, &request.headers);

        if response.header(DATE).and_then(httpdate::parse).is_none() {
            entry.set_header("date", httpdate::format(Utc::now()));
        }

        let storable = if headers.contains_key(ETAG) {
            true
        } else if PERMANENT_REDIRECTS.contains(&status) {
            entry.body = bytes::Bytes::new();
            true
        } else if response_cc.max_age.is_some_and(|age| age > 0) {
            true
        } else {
            headers.contains_key(EXPIRES)
        };

        if !storable {
            debug!(%key, "response is not storable");
            return Ok(false);
        }

        self.storage.set(&key, &entry)?;
        debug!(%key, status, "stored response");
        Ok(true)
    }

    /// Fold a `304 Not Modified` into the stored response and return it.
    ///
    /// Without a stored response, `response` is returned unchanged.
    pub fn update_cached_response(&self, request: &Request, response: Response) -> Result<Response> {
        let key = Self::cache_key(&request.url);
        let Some(mut entry) = self.storage.get(&key)? else {
            return Ok(response);
        };

        for (name, value) in &response.headers {
            if name == CONTENT_LENGTH {
                continue;
            }
            if let Ok(value) = value.to_str() {
                entry.set_header(name.as_str(), value);
            }
        }
        entry.status = 200;

        self.storage.set(&key, &entry)?;
        debug!(%key, "revalidated stored response");
        Ok(entry.to_response()?.mark_from_cache())
    }

    pub fn invalidate(&self, url: &Url) -> Result<()> {
        let key = Self::cache_key(url);
        debug!(%key, "invalidating stored response");
        self.storage.delete(&key)
    }
}

fn vary_names(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
}

fn vary_values(response: &Response, request_headers: &HeaderMap) -> Vec<(String, Option<String>)> {
    let Some(vary) = response.header(VARY) else {
        return Vec::new();
    };
    vary_names(vary)
        .map(|name| {
            let value = request_headers
                .get(name.as_str())
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            (name, value)
        })
        .collect()
}

fn vary_matches(entry: &CachedResponse, request_headers: &HeaderMap) -> bool {
    entry.vary.iter().all(|(name, stored)| {
        let current = request_headers.get(name.as_str()).and_then(|v| v.to_str().ok());
        current == stored.as_deref()
    })
}
