//! Router integration tests
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use lacuna_core::{Lacuna, LacunaConfig};
use lacuna_server::router;
use tempfile::TempDir;
use tower::ServiceExt;

const TABLES_DIR: &str = "../../tests/fixtures/tables";

fn public_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Lacuna</h1>").unwrap();
    std::fs::write(dir.path().join("stats.html"), "<h1>Statistics</h1>").unwrap();
    dir
}

fn app(public: &TempDir) -> axum::Router {
    let lacuna = Lacuna::from_dir(TABLES_DIR, LacunaConfig::default()).unwrap();
    router(Arc::new(lacuna), public.path(), Duration::from_secs(10))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_wiki_missing_parameters() {
    let public = public_dir();
    let (status, body) = get(app(&public), "/wiki").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "<html><head></head><body><h1>No processing possible. Parameter invalid!</h1></body></html>"
    );
}

#[tokio::test]
async fn test_wiki_not_wikipedia() {
    let public = public_dir();
    let (status, body) = get(app(&public), "/wiki?url=https%3A%2F%2Fwww.google.de%2F&cloze=articles").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Only Wikipedia pages supported!"));
}

#[tokio::test]
async fn test_wiki_unsupported_language() {
    let public = public_dir();
    let (status, body) = get(
        app(&public),
        "/wiki?url=https%3A%2F%2Fda.wikipedia.org%2Fwiki%2FHarry_Potter&cloze=ARTICLES",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Language not supported!"));
}

#[tokio::test]
async fn test_wiki_unknown_class() {
    let public = public_dir();
    let (_, body) = get(app(&public), "/wiki?url=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FCrab&cloze=verbs").await;

    assert!(body.contains("Parameter invalid!"));
}

#[tokio::test]
async fn test_languages() {
    let public = public_dir();
    let (status, body) = get(app(&public), "/languages").await;

    assert_eq!(status, StatusCode::OK);
    let languages: Vec<String> = serde_json::from_str(&body).unwrap();
    assert_eq!(languages, vec!["de", "en"]);
}

#[tokio::test]
async fn test_static_pages() {
    let public = public_dir();

    let (status, body) = get(app(&public), "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Statistics"));

    let (status, body) = get(app(&public), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Lacuna"));

    let (status, _) = get(app(&public), "/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
