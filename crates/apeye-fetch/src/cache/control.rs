use reqwest::header::{CACHE_CONTROL, HeaderMap};

/// `Cache-Control` directives understood by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    pub max_age:         Option<u64>,
    pub s_maxage:        Option<u64>,
    pub min_fresh:       Option<u64>,
    pub no_cache:        bool,
    pub no_store:        bool,
    pub must_revalidate: bool,
    pub private:         bool,
    pub public:          bool,
}

impl CacheControl {
    pub fn parse(header: &str) -> Self {
        let mut control = Self::default();

        for directive in header.split(',') {
            let (name, value) = match directive.split_once('=') {
                Some((name, value)) => (name.trim(), Some(value.trim().trim_matches('"'))),
                None => (directive.trim(), None),
            };
            let seconds = value.and_then(|v| v.parse::<u64>().ok());

            match name.to_ascii_lowercase().as_str() {
                "no-cache" => control.no_cache = true,
                "no-store" => control.no_store = true,
                "must-revalidate" => control.must_revalidate = true,
                "private" => control.private = true,
                "public" => control.public = true,
                "max-age" => control.max_age = seconds.or(control.max_age),
                "s-maxage" => control.s_maxage = seconds.or(control.s_maxage),
                "min-fresh" => control.min_fresh = seconds.or(control.min_fresh),
                _ => {}
            }
        }

        control
    }

    /// Directives from every `Cache-Control` header in `headers`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let joined = headers
            .get_all(CACHE_CONTROL)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join(",");
        Self::parse(&joined)
    }
}
