use apeye_fetch::{
    CacheAdapter, CacheController, DictCache, Error, HttpCache, HttpCacheOptions, ReqwestTransport,
    RequestsUrl, Session, SlumberOptions, SlumberUrl, Transport, rate_limit,
};
use apeye_url::Query;
use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session() -> Session { Session::new().expect("failed to build session") }

#[tokio::test]
async fn test_http_cache_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/time"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"datetime": "2020-01-01T00:00:00"}))
                .insert_header("cache-control", "max-age=0, private, must-revalidate"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let cache = HttpCache::with_options(
        "testing_apeye_http",
        HttpCacheOptions::new()
            .dir(dir.path().join("testing_apeye_http"))
            .min_interval(Duration::from_millis(10)),
    )
    .unwrap();
    let url = format!("{}/time", server.uri());

    let first = cache.session().get(&url).await.unwrap();
    assert_eq!(first.status, 200);
    assert!(!first.from_cache());

    let second = cache.session().get(&url).await.unwrap();
    assert!(second.from_cache());
    assert_eq!(second.body, first.body);

    assert!(cache.cache_dir().is_dir());
    assert!(cache.clear().unwrap());
    assert!(!cache.cache_dir().is_dir());

    let third = cache.session().get(&url).await.unwrap();
    assert!(!third.from_cache());
    assert!(cache.clear().unwrap());
    assert!(!cache.clear().unwrap());
}

#[tokio::test]
async fn test_etag_revalidation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .and(header("if-none-match", "\"v1\""))
        .respond_with(ResponseTemplate::new(304).insert_header("x-revalidated", "yes"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("original")
                .insert_header("etag", "\"v1\"")
                .insert_header("cache-control", "max-age=0"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = CacheAdapter::new(ReqwestTransport::new().unwrap(), CacheController::new(DictCache::new()));
    let session = Session::with_transport(transport);
    let url = format!("{}/doc", server.uri());

    let first = session.get(&url).await.unwrap();
    assert!(!first.from_cache());

    let second = session.get(&url).await.unwrap();
    assert_eq!(second.status, 200);
    assert!(second.from_cache());
    assert_eq!(second.text(), "original");
    assert_eq!(second.header("x-revalidated"), Some("yes"));
}

#[tokio::test]
async fn test_requests_url_get_uses_own_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string("own"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "serde"))
        .respond_with(ResponseTemplate::new(200).set_body_string("explicit"))
        .mount(&server)
        .await;

    let url = RequestsUrl::with_session(format!("{}/search?q=rust", server.uri()), session());
    assert_eq!(url.get(None).await.unwrap().text(), "own");

    let params: Query = [("q", "serde")].into_iter().collect();
    assert_eq!(url.get(Some(&params)).await.unwrap().text(), "explicit");
}

#[tokio::test]
async fn test_requests_url_resolve() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let old = RequestsUrl::with_session(format!("{}/old", server.uri()), session());
    assert_eq!(old.head().await.unwrap().status, 301);

    let resolved = old.resolve().await.unwrap();
    assert_eq!(resolved.to_string(), format!("{}/new", server.uri()));
    assert!(Arc::ptr_eq(resolved.session().transport(), old.session().transport()));

    let missing = &old.parent() / "missing";
    let err = missing.resolve().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Could not resolve Url('{}/missing'): HTTP Status 404", server.uri())
    );
}

#[tokio::test]
async fn test_slumber_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/"))
        .and(header("accept", "application/json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"login": "domdfcoding"}])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"login": "new"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/7/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/users/7/"))
        .respond_with(ResponseTemplate::new(205))
        .mount(&server)
        .await;

    let api = SlumberUrl::with_options(
        format!("{}/users", server.uri()),
        SlumberOptions::new().session(session()),
    )
    .unwrap();

    assert_eq!(api.get(&[("page", "2")]).await.unwrap(), json!([{"login": "domdfcoding"}]));
    assert_eq!(api.post(Some(&json!({"login": "new"})), &[]).await.unwrap(), json!({"id": 7}));

    let user = &api / 7;
    assert!(user.delete(&[]).await.unwrap());
    assert_eq!(user.put(Some(&json!({"login": "x"})), &[]).await.unwrap(), json!({}));
}

#[tokio::test]
async fn test_slumber_error_statuses() {
    let server = MockServer::start().await;
    for (route, status) in [("/missing/", 404), ("/bad/", 400), ("/broken/", 503)] {
        Mock::given(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .mount(&server)
            .await;
    }

    let api = SlumberUrl::with_options(server.uri(), SlumberOptions::new().session(session())).unwrap();

    let err = (&api / "missing").get(&[]).await.unwrap_err();
    assert!(matches!(&err, Error::HttpNotFound { content, .. } if &content[..] == b"nope"));
    assert_eq!(err.to_string(), format!("Client Error 404: {}/missing/", server.uri()));

    let err = (&api / "bad").delete(&[]).await.unwrap_err();
    assert!(matches!(err, Error::HttpClient { status: 400, .. }));
    assert!(err.is_client_error());

    let err = (&api / "broken").post(None, &[]).await.unwrap_err();
    assert_eq!(err.to_string(), format!("Server Error 503: {}/broken/", server.uri()));
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_slumber_options_and_head() {
    let server = MockServer::start().await;
    Mock::given(method("OPTIONS"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).insert_header("allow", "GET, POST"))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-total", "3"))
        .mount(&server)
        .await;

    let items = SlumberUrl::with_options(
        format!("{}/items", server.uri()),
        SlumberOptions::new().session(session()),
    )
    .unwrap();
    assert_eq!(items.options().await.unwrap(), "GET, POST");
    assert_eq!(items.head().await.unwrap()["x-total"], "3");

    let missing = &items / "none";
    assert_eq!(missing.options().await.unwrap(), "");
}

#[tokio::test]
async fn test_basic_auth_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = SlumberUrl::with_options(
        server.uri(),
        SlumberOptions::new().session(session()).basic_auth("user", "pass"),
    )
    .unwrap();
    assert_eq!(api.get(&[]).await.unwrap(), json!({"ok": true}));
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}

impl Capture {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(String::from)
            .collect()
    }
}

fn seconds_in(line: &str, before: &str, after: &str) -> f64 {
    let start = line.find(before).unwrap() + before.len();
    let end = start + line[start..].find(after).unwrap();
    line[start..end].parse().unwrap()
}

#[test]
fn test_rate_limit_log_lines() {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let limited = rate_limit("rate_limited_function", Duration::from_millis(300), |x: u32| x * 2);
        assert_eq!(limited.call(21), 42);
        assert_eq!(limited.call(21), 42);
        std::thread::sleep(Duration::from_millis(400));
        assert_eq!(limited.call(21), 42);
    });

    let lines: Vec<String> = capture
        .lines()
        .into_iter()
        .filter(|l| l.contains("rate_limited_function: "))
        .collect();
    assert_eq!(lines.len(), 3, "{lines:#?}");

    assert!(seconds_in(&lines[0], "rate_limited_function: Last ran ", " seconds ago.") < 0.3);
    let waited = seconds_in(&lines[1], "rate_limited_function: Waiting ", " seconds.");
    assert!(waited > 0.0 && waited <= 0.3);
    assert!(seconds_in(&lines[2], "rate_limited_function: Last ran ", " seconds ago.") >= 0.1);
}

#[tokio::test]
async fn test_transport_trait_objects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hi"))
        .mount(&server)
        .await;

    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new().unwrap());
    let session = Session::with_transport(transport);
    assert_eq!(session.get(&server.uri()).await.unwrap().text(), "hi");
}
