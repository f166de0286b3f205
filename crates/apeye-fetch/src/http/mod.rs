//! Request and response types, the [`Transport`] seam and [`Session`].

mod message;
mod session;
mod transport;

pub use message::{Body, Request, Response};
pub(crate) use message::{header_name, header_value, parse_url};
pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
pub use reqwest::{Method, StatusCode};
pub use session::Session;
pub use transport::{ReqwestTransport, Transport};
