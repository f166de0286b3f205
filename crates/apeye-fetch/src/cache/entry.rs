use crate::http::{HeaderMap, Response, StatusCode, header_name, header_value, parse_url};
use crate::{Error, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A stored response, as written by a [`CacheStorage`](super::CacheStorage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub url:     String,
    pub status:  u16,
    pub headers: Vec<(String, String)>,
    /// Request headers named by the response's `Vary`, as sent.
    #[serde(default)]
    pub vary:    Vec<(String, Option<String>)>,
    #[serde(with = "base64_body")]
    pub body:    Bytes,
}

impl CachedResponse {
    pub fn from_response(response: &Response) -> Self {
        let headers = response
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Self {
            url: response.url.to_string(),
            status: response.status.as_u16(),
            headers,
            vary: Vec::new(),
            body: response.body.clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replace every value of `name` with `value`.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_ascii_lowercase(), value.into()));
    }

    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            headers.append(header_name(name)?, header_value(name, value)?);
        }
        Ok(headers)
    }

    pub fn to_response(&self) -> Result<Response> {
        let status = StatusCode::from_u16(self.status).map_err(|e| Error::InvalidHeader {
            name:   ":status".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Response::new(status, parse_url(&self.url)?, self.header_map()?, self.body.clone()))
    }
}

mod base64_body {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded)
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
