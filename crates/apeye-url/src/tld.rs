use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::Ipv4Addr;

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([a-z0-9+.\-]+:)?//").expect("valid scheme regex"));

static SUFFIXES: Lazy<SuffixList> = Lazy::new(|| SuffixList::parse(include_str!("suffixes.dat")));

/// Public suffix rules, with `*.` wildcards and `!` exceptions.
pub struct SuffixList {
    rules: HashSet<String>,
}

impl SuffixList {
    pub fn parse(data: &str) -> Self {
        let rules = data
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with("//"))
            .map(str::to_lowercase)
            .collect();
        Self { rules }
    }

    pub fn contains(&self, rule: &str) -> bool { self.rules.contains(rule) }

    /// Index of the first label that belongs to the public suffix.
    /// Equal to `labels.len()` when no rule matches.
    pub fn suffix_index(&self, labels: &[&str]) -> usize {
        let lower: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();
        for i in 0..lower.len() {
            let candidate = lower[i..].join(".");
            if self.rules.contains(&format!("!{candidate}")) {
                return i + 1;
            }
            if self.rules.contains(&candidate) {
                return i;
            }
            let wildcard = format!("*.{}", lower[i + 1..].join("."));
            if self.rules.contains(&wildcard) {
                return i;
            }
        }
        lower.len()
    }
}

/// A hostname split into subdomain, registrable label and public suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Domain {
    pub subdomain: String,
    pub domain:    String,
    pub suffix:    String,
}

impl Domain {
    pub fn new(
        subdomain: impl Into<String>,
        domain: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            subdomain: subdomain.into(),
            domain:    domain.into(),
            suffix:    suffix.into(),
        }
    }

    /// Split the host of `url`, which may be a bare hostname or a full URL.
    pub fn extract(url: &str) -> Self { extract_with(&SUFFIXES, url) }

    /// `subdomain.domain.suffix`, empty unless both domain and suffix are known.
    pub fn fqdn(&self) -> String {
        if self.domain.is_empty() || self.suffix.is_empty() {
            return String::new();
        }
        [&self.subdomain, &self.domain, &self.suffix]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// `domain.suffix`, empty unless both are known.
    pub fn registered_domain(&self) -> String {
        if self.domain.is_empty() || self.suffix.is_empty() {
            return String::new();
        }
        format!("{}.{}", self.domain, self.suffix)
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        if !self.subdomain.is_empty() || !self.suffix.is_empty() {
            return None;
        }
        self.domain.parse().ok()
    }
}

fn host_of(url: &str) -> &str {
    let url = url.trim();
    let rest = match SCHEME_RE.find(url) {
        Some(m) => &url[m.end()..],
        None => url,
    };
    let netloc = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = netloc.rsplit('@').next().unwrap_or("");
    let host = host.split(':').next().unwrap_or("");
    host.strip_suffix('.').unwrap_or(host)
}

pub fn extract_with(list: &SuffixList, url: &str) -> Domain {
    let host = host_of(url);

    if host.parse::<Ipv4Addr>().is_ok() {
        return Domain::new("", host, "");
    }

    let labels: Vec<&str> = host.split('.').collect();
    let i = list.suffix_index(&labels);
    let suffix = labels[i..].join(".");

    if i == 0 {
        return Domain::new("", "", suffix);
    }
    Domain::new(labels[..i - 1].join("."), labels[i - 1], suffix)
}
