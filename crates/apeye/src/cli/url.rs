use super::app::UrlArg;
use anyhow::{Context, Result};
use apeye::{Domain, Query, Url};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct Components<'a> {
    url:      String,
    scheme:   &'a str,
    netloc:   &'a str,
    path:     String,
    query:    &'a Query,
    fragment: Option<&'a str>,
    domain:   Domain,
    fqdn:     String,
    port:     Option<u16>,
    name:     &'a str,
    suffix:   &'a str,
    stem:     &'a str,
    parent:   String,
}

impl<'a> Components<'a> {
    fn of(url: &'a Url) -> Self {
        Self {
            url:      url.to_string(),
            scheme:   &url.scheme,
            netloc:   &url.netloc,
            path:     url.path.to_string(),
            query:    &url.query,
            fragment: url.fragment.as_deref(),
            domain:   url.domain(),
            fqdn:     url.fqdn(),
            port:     url.port(),
            name:     url.name(),
            suffix:   url.suffix(),
            stem:     url.stem(),
            parent:   url.parent().to_string(),
        }
    }
}

pub fn show(arg: &UrlArg, out: &mut impl Write) -> Result<()> {
    let url = Url::parse(&arg.url);
    let json = serde_json::to_string_pretty(&Components::of(&url)).context("failed to render URL components")?;
    writeln!(out, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn components(url: &str) -> Value {
        let mut out = Vec::new();
        show(&UrlArg { url: url.to_string() }, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_url_components() {
        let value = components("https://www.bbc.co.uk:443/programmes/b006qtlx/episodes.html?page=2#top");
        assert_eq!(value["scheme"], "https");
        assert_eq!(value["netloc"], "www.bbc.co.uk:443");
        assert_eq!(value["path"], "/programmes/b006qtlx/episodes.html");
        assert_eq!(value["query"], json!({"page": ["2"]}));
        assert_eq!(value["fragment"], "top");
        assert_eq!(value["domain"], json!({"subdomain": "www", "domain": "bbc", "suffix": "co.uk"}));
        assert_eq!(value["fqdn"], "www.bbc.co.uk");
        assert_eq!(value["port"], 443);
        assert_eq!(value["name"], "episodes.html");
        assert_eq!(value["suffix"], ".html");
        assert_eq!(value["stem"], "episodes");
        assert_eq!(value["parent"], "https://www.bbc.co.uk:443/programmes/b006qtlx");
    }

    #[test]
    fn test_bare_path() {
        let value = components("/news");
        assert_eq!(value["scheme"], "");
        assert_eq!(value["fqdn"], "");
        assert_eq!(value["port"], Value::Null);
        assert_eq!(value["fragment"], Value::Null);
    }
}
