//! Fetch-and-classify tests against a local mock HTTP server.

use statecheck::{Classification, EngineConfig};
use statecheck_cli::{run, CheckOptions, FetchError, Fetcher, Input};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── helpers ──

fn options(url: String) -> CheckOptions {
    CheckOptions {
        input: Input::Url(url),
        engine: EngineConfig::default(),
        timeout_ms: 5_000,
        body_only: false,
        json: true,
        explain: false,
    }
}

async fn classification_of(opts: &CheckOptions) -> Classification {
    let out = run(opts).await.expect("run should succeed");
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    value["classification"]
        .as_str()
        .expect("classification string")
        .parse()
        .expect("known classification")
}

// ── tests ──

#[tokio::test]
async fn set_cookie_header_reaches_the_engine() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "PHPSESSID=abc; Path=/")
                .set_body_string("<form><input type=\"hidden\" name=\"csrf\"></form>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/login", server.uri());
    let fetcher = Fetcher::new(5_000).unwrap();
    let page = fetcher.fetch(&url).await.unwrap();
    assert_eq!(page.status, 200);
    assert!(page.document(true).contains("Set-Cookie: PHPSESSID=abc; Path=/"));
    assert!(!page.document(false).contains("Set-Cookie"));

    assert_eq!(classification_of(&options(url)).await, Classification::Stateful);
}

#[tokio::test]
async fn body_only_hides_the_cookie_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sid=1")
                .set_body_string("<input type='hidden' name='x'>"),
        )
        .mount(&server)
        .await;

    let mut opts = options(server.uri());
    opts.body_only = true;
    // Only the hidden field fires; the body has no stateless markers either.
    assert_eq!(classification_of(&opts).await, Classification::Undetermined);

    opts.body_only = false;
    assert_eq!(classification_of(&opts).await, Classification::Stateful);
}

#[tokio::test]
async fn resource_links_classify_stateless() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<a href=\"/users/42\">profile</a><a href=\"/users?page=2\">more</a>"),
        )
        .mount(&server)
        .await;

    let mut opts = options(format!("{}/", server.uri()));
    opts.json = false;
    let out = run(&opts).await.unwrap();
    assert!(out.ends_with("is Stateless"), "{out}");
}

#[tokio::test]
async fn redirects_are_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("?"))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(5_000).unwrap();
    let page = fetcher.fetch(&format!("{}/old", server.uri())).await.unwrap();
    assert_eq!(page.status, 301);
    assert!(page.body.is_empty());
}

#[tokio::test]
async fn error_status_is_still_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    // One request only: no retry on 5xx.
    let opts = options(server.uri());
    assert_eq!(classification_of(&opts).await, Classification::Undetermined);
}

#[tokio::test]
async fn signal_free_html_page_is_undetermined() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", "</assets/site.css?v=3>; rel=preload")
                .set_body_raw("Welcome to our site", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    // Content-Type and Link values must not reach the stateless detectors.
    let opts = options(server.uri());
    assert!(!opts.body_only);
    assert_eq!(classification_of(&opts).await, Classification::Undetermined);
}

#[tokio::test]
async fn invalid_url_fails_before_any_request() {
    let fetcher = Fetcher::new(5_000).unwrap();
    let err = fetcher.fetch("not a url").await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl { .. }));

    assert!(run(&options("not a url".into())).await.is_err());
}

#[tokio::test]
async fn unreachable_host_is_a_terminal_error() {
    // Nothing listens on port 1.
    let fetcher = Fetcher::new(2_000).unwrap();
    let err = fetcher.fetch("http://127.0.0.1:1/").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
}
