//! Path-like URLs.
//!
//! [`Url`] treats a URL the way a pure path type treats a filesystem path:
//! it can be joined with `/`, and has a parent, a name and suffixes. Its
//! netloc can be split into subdomain, domain and public suffix through
//! [`Domain`], backed by an embedded public-suffix list.
//!
//! ```
//! use apeye_url::Url;
//!
//! let url = Url::parse("https://www.bbc.co.uk/programmes") / "b006qtlx";
//! assert_eq!(url.to_string(), "https://www.bbc.co.uk/programmes/b006qtlx");
//! assert_eq!(url.domain().suffix, "co.uk");
//! ```

mod error;
mod path;
mod query;
mod tld;
mod url;

pub use error::{Error, Result};
pub use path::UrlPath;
pub use query::Query;
pub use tld::{Domain, SuffixList, extract_with};
pub use url::{IntoSegment, RelativeBase, Url};
