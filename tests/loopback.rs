//! Loopback transport tests: a real HTTP client against the local server.
#![cfg(unix)]

use gh_transport::{LocalTransport, TransportConfig, TransportError};

mod common;
use common::FakeGh;

#[tokio::test]
async fn client_reaches_program_over_loopback() {
    let gh = FakeGh::printing(r#"{"login":"octocat"}"#);
    let transport = LocalTransport::start(gh.config()).await.unwrap();

    let res = transport
        .client()
        .get(transport.url("/users/octocat"))
        .send()
        .await
        .expect("transport unreachable");

    assert_eq!(res.status(), 200);
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json["login"], "octocat");
    assert_eq!(gh.args(), ["api", "-X", "GET", "users/octocat"]);

    transport.shutdown().await.unwrap();
}

#[tokio::test]
async fn client_answers_any_http_host_locally() {
    let gh = FakeGh::printing(r#"{"login":"octocat"}"#);
    let transport = LocalTransport::start(gh.config()).await.unwrap();

    let res = transport
        .client()
        .get("http://api.github.invalid/users/octocat?per_page=5")
        .send()
        .await
        .expect("request left the machine");

    assert_eq!(res.status(), 200);
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json["login"], "octocat");
    assert_eq!(gh.args(), ["api", "-X", "GET", "users/octocat?per_page=5"]);

    transport.shutdown().await.unwrap();
}

#[tokio::test]
async fn follows_link_header_across_pages() {
    let gh = FakeGh::printing(r#"[{"n":1}][{"n":2}][{"n":3}]"#);
    let transport = LocalTransport::start(gh.config()).await.unwrap();

    let mut seen = Vec::new();
    let mut next = Some("/repos/o/r/issues?state=all&page=1&per_page=1".to_string());
    while let Some(path) = next.take() {
        let res = transport.client().get(transport.url(&path)).send().await.unwrap();
        assert_eq!(res.status(), 200);

        next = res
            .headers()
            .get("link")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix('<'))
            .and_then(|v| v.split_once('>'))
            .map(|(uri, _)| uri.to_string());

        let page: Vec<serde_json::Value> = res.json().await.unwrap();
        seen.extend(page.into_iter().map(|item| item["n"].as_i64().unwrap()));
    }

    assert_eq!(seen, vec![1, 2, 3]);
    transport.shutdown().await.unwrap();
}

#[tokio::test]
async fn upstream_status_reaches_client() {
    let gh = FakeGh::failing("gh: Not Found (HTTP 404)");
    let transport = LocalTransport::start(gh.config()).await.unwrap();

    let res = transport
        .client()
        .get(transport.url("/users/konohitohaimasen"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    transport.shutdown().await.unwrap();
}

#[tokio::test]
async fn missing_program_fails_at_start() {
    let mut config = TransportConfig::default();
    config.program.name = "gh-does-not-exist-41b2".into();

    let err = LocalTransport::start(config).await.err().unwrap();
    assert!(matches!(err, TransportError::ProgramNotFound { .. }));
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let gh = FakeGh::printing(r#"{"ok":true}"#);
    let transport = LocalTransport::start(gh.config()).await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let client = transport.client().clone();
        let url = transport.url(&format!("/repos/o/r/issues/{i}"));
        tasks.push(tokio::spawn(async move {
            client.get(url).send().await.unwrap().status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), 200);
    }

    transport.shutdown().await.unwrap();
}
