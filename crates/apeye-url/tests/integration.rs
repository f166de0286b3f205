use apeye_url::{Domain, Error, Query, Url, UrlPath};
use std::collections::HashSet;
use std::net::Ipv4Addr;

fn url(s: &str) -> Url { Url::parse(s) }

#[test]
fn test_division() {
    let episodes = url("https://www.bbc.co.uk/programmes/b006qtlx/episodes");
    assert_eq!(&episodes / "player", url("https://www.bbc.co.uk/programmes/b006qtlx/episodes/player"));
    assert_eq!(&episodes / "/news", url("https://www.bbc.co.uk/news"));
    assert_eq!(&episodes / UrlPath::new("player"), url("https://www.bbc.co.uk/programmes/b006qtlx/episodes/player"));
    assert_eq!(&episodes / url("player"), url("https://www.bbc.co.uk/programmes/b006qtlx/episodes/player"));
    assert_eq!(&episodes / url("/news"), url("https://www.bbc.co.uk/news"));

    assert_eq!(url("www.bbc.co.uk") / "news", url("www.bbc.co.uk/news"));
    assert_eq!(Url::default() / "news", url("/news"));
    assert_eq!(url("/programmes/b006qtlx/episodes") / "/news", url("/news"));
}

#[test]
fn test_division_number() {
    for count in [0u32, 7, 99] {
        let joined = Url::default() / count;
        assert_eq!(joined.parts().last().unwrap(), &count.to_string());
    }
}

#[test]
fn test_division_drops_query_and_fragment() {
    let api = url("https://api.github.com?foo=bar#footer");
    assert_eq!(api.query.first("foo"), Some("bar"));
    assert_eq!(api.fragment.as_deref(), Some("footer"));

    let users = &api / "users";
    assert!(users.query.is_empty());
    assert!(users.fragment.is_none());
}

#[test]
fn test_joinurl() {
    let value = url("https://www.bbc.co.uk/programmes/b006qtlx/episodes").joinurl(["player"]);
    assert_eq!(value, url("https://www.bbc.co.uk/programmes/b006qtlx/episodes/player"));

    assert_eq!(Url::default().joinurl(["news"]), url("/news"));
    assert_eq!(url("www.bbc.co.uk").joinurl(["news", "sport"]), url("www.bbc.co.uk/news/sport"));

    let value = url("www.bbc.co.uk").joinurl(["news#anchor", "sport?que=ry"]);
    assert!(value.strict_eq(&url("www.bbc.co.uk/news/sport?que=ry")));

    let value = url("www.bbc.co.uk").joinurl(["news?que=ry", "sport#anchor"]);
    assert!(value.strict_eq(&url("www.bbc.co.uk/news/sport#anchor")));
}

#[test]
fn test_empty_url_operations() {
    let empty = Url::default();
    assert_eq!(empty.name(), "");
    assert_eq!(empty.suffix(), "");
    assert_eq!(empty.fqdn(), "");
    assert_eq!(empty.stem(), "");
    assert!(empty.suffixes().is_empty());
    assert_eq!(empty.port(), None);
}

#[test]
fn test_name_suffix_stem() {
    let tarball = url("https://github.com/domdfcoding/domdf_python_tools/releases/download/v0.4.8/domdf_python_tools-0.4.8.tar.gz");
    assert_eq!(tarball.name(), "domdf_python_tools-0.4.8.tar.gz");
    assert_eq!(tarball.suffix(), ".gz");
    assert_eq!(tarball.suffixes(), vec![".4", ".8", ".tar", ".gz"]);
    assert_eq!(tarball.stem(), "domdf_python_tools-0.4.8.tar");

    assert_eq!(url("www.bbc.co.uk").name(), "");
    assert_eq!(url("https://imgs.xkcd.com/comics/workflow.png").suffix(), ".png");
}

#[test]
fn test_with_name() {
    let with_query = url("https://www.bbc.co.uk/programmes/b006qtlx/episodes?que=ry#fragment");

    let renamed = with_query.with_name("foo", false).unwrap();
    assert!(renamed.strict_eq(&url("https://www.bbc.co.uk/programmes/b006qtlx/foo")));

    let inherited = with_query.with_name("foo", true).unwrap();
    assert!(inherited.strict_eq(&url("https://www.bbc.co.uk/programmes/b006qtlx/foo?que=ry#fragment")));

    let err = url("www.bbc.co.uk").with_name("bar", false).unwrap_err();
    assert_eq!(err.to_string(), "UrlPath('') has an empty name");
    assert!(matches!(Url::default().with_name("bar", false), Err(Error::EmptyName(_))));
}

#[test]
fn test_with_suffix() {
    let png = url("https://imgs.xkcd.com/comics/workflow.png");
    assert_eq!(png.with_suffix(".baz", false).unwrap(), url("https://imgs.xkcd.com/comics/workflow.baz"));

    let with_query = url("https://www.bbc.co.uk/programmes/b006qtlx/episodes?que=ry");
    let inherited = with_query.with_suffix(".foo", true).unwrap();
    assert_eq!(inherited.to_string(), "https://www.bbc.co.uk/programmes/b006qtlx/episodes.foo?que=ry");
    assert!(with_query.with_suffix(".foo", false).unwrap().query.is_empty());
}

#[test]
fn test_parent_and_parents() {
    assert_eq!(
        url("https://imgs.xkcd.com/comics/workflow.png").parent(),
        url("https://imgs.xkcd.com/comics")
    );
    assert_eq!(url("/programmes/b006qtlx/episodes").parent(), url("/programmes/b006qtlx"));

    let parents = url("https://hub.docker.com/r/tobix/pywine/dockerfile").parents();
    assert_eq!(
        parents,
        vec![
            url("https://hub.docker.com/r/tobix/pywine"),
            url("https://hub.docker.com/r/tobix"),
            url("https://hub.docker.com/r"),
            url("https://hub.docker.com/"),
        ]
    );
    assert_eq!(parents.last().unwrap().to_string(), "https://hub.docker.com/");
}

#[test]
fn test_domain_and_fqdn() {
    let bbc = url("https://www.bbc.co.uk/programmes/b006qtlx/episodes");
    assert_eq!(bbc.domain(), Domain::new("www", "bbc", "co.uk"));
    assert_eq!(bbc.fqdn(), "www.bbc.co.uk");
    assert_eq!(bbc.domain().registered_domain(), "bbc.co.uk");

    assert_eq!(url("/programmes/b006qtlx/episodes").fqdn(), "");

    let ftp = url("ftp://127.0.0.1/download.zip");
    assert_eq!(ftp.domain(), Domain::new("", "127.0.0.1", ""));
    assert_eq!(ftp.domain().ipv4(), Some(Ipv4Addr::LOCALHOST));
}

#[test]
fn test_parts() {
    assert_eq!(
        url("https://hub.docker.com/r/tobix/pywine/dockerfile").parts(),
        ["https", "hub", "docker", "com", "r", "tobix", "pywine", "dockerfile"]
    );
}

#[test]
fn test_fspath() {
    assert_eq!(url("bbc.co.uk/news").fspath(), "bbc.co.uk/news");
    assert_eq!(url("https://bbc.co.uk/news").fspath(), "bbc.co.uk/news");
    assert_eq!(url("https://www.bbc.co.uk/news").fspath(), "www.bbc.co.uk/news");
}

#[test]
fn test_hash_and_equality_ignore_query() {
    let mut set = HashSet::new();
    set.insert(url("bbc.co.uk"));
    assert!(set.contains(&url("bbc.co.uk")));
    assert!(!set.contains(&url("bbc.co.uk/news")));

    let a = url("https://api.github.com/user?page=2");
    let b = url("https://api.github.com/user#top");
    assert_eq!(a, b);
    assert!(!a.strict_eq(&b));
    assert!(a.strict_eq(&url("https://api.github.com/user?page=2")));
}

#[test]
fn test_query() {
    let repos = url("https://api.github.com/user/domdfcoding/repos?page=2&per_page=50");
    let expected: Query = [("page", "2"), ("per_page", "50")].into_iter().collect();
    assert_eq!(repos.query, expected);
    assert!(url("https://api.github.com/user/domdfcoding/repos").query.is_empty());
    assert_eq!(repos.base_url().to_string(), "https://api.github.com/user/domdfcoding/repos");
}

#[test]
fn test_relative_to() {
    let expected = UrlPath::new("domdfcoding");
    assert_eq!(url("https://github.com/domdfcoding").relative_to(&url("https://github.com")).unwrap(), expected);
    assert_eq!(url("https://github.com/domdfcoding").relative_to(&url("https://GitHub.COM")).unwrap(), expected);

    let football = url("https://www.bbc.co.uk:443/news/sport/football");
    assert_eq!(football.relative_to("/news/sport").unwrap(), UrlPath::new("football"));
    assert_eq!(football.relative_to(UrlPath::new("/news/sport")).unwrap(), UrlPath::new("football"));

    assert_eq!(football.relative_to(UrlPath::new("news/sport")).unwrap_err(), Error::RelativePath);

    let err = url("https://github.com/domdfcoding").relative_to(&url("https://bbc.co.uk/news")).unwrap_err();
    assert!(err.to_string().contains("does not start with"));

    let err = url("https://bbc.co.uk/news/sport/football").relative_to("news/sport").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Url('https://bbc.co.uk/news/sport/football') does not start with Url('news/sport')"
    );

    let mut relative_path = url("https://github.com/domdfcoding");
    relative_path.path = UrlPath::new("domdfcoding");
    assert_eq!(relative_path.relative_to(&url("https://github.com")).unwrap(), expected);
}

#[test]
fn test_ordering() {
    let football = url("https://bbc.co.uk:443/news/sport/football");
    let tennis = url("https://bbc.co.uk:443/news/sport/tennis");
    assert!(football < tennis);
    let mut sorted = vec![tennis.clone(), football.clone()];
    sorted.sort();
    assert_eq!(sorted, vec![football.clone(), tennis]);

    assert!(url("https://bbc.co.uk:80/news/sport/tennis") < football);
    assert!(url("http://bbc.co.uk/news/sport/tennis") < url("https://bbc.co.uk/news/sport/football"));
    assert!(url("https://bbc.co.uk/news/sport/tennis") < url("https://news.bbc.co.uk/sport/tennis"));
}

#[test]
fn test_serde_as_string() {
    let value = serde_json::to_value(url("https://bbc.co.uk/news?a=1")).unwrap();
    assert_eq!(value, serde_json::json!("https://bbc.co.uk/news?a=1"));
    let back: Url = serde_json::from_value(value).unwrap();
    assert!(back.strict_eq(&url("https://bbc.co.uk/news?a=1")));
}
