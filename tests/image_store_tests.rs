//! Image download and on-disk replacement.

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atelier::error::AtelierError;
use atelier::store::ImageStore;

async fn serve(server: &MockServer, route: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn download_creates_parent_directories() {
    let server = MockServer::start().await;
    serve(&server, "/a.png", b"first image").await;
    let dir = TempDir::new().unwrap();
    let store = ImageStore::new(dir.path().join("resource/images/background.png"));

    let written = store.save(&format!("{}/a.png", server.uri())).await.unwrap();

    assert_eq!(written, 11);
    assert_eq!(std::fs::read(store.path()).unwrap(), b"first image");
}

#[tokio::test]
async fn second_save_replaces_first() {
    let server = MockServer::start().await;
    serve(&server, "/long.png", &[7u8; 2048]).await;
    serve(&server, "/short.png", b"tiny").await;
    let dir = TempDir::new().unwrap();
    let store = ImageStore::new(dir.path().join("background.png"));

    store.save(&format!("{}/long.png", server.uri())).await.unwrap();
    store.save(&format!("{}/short.png", server.uri())).await.unwrap();

    assert_eq!(std::fs::read(store.path()).unwrap(), b"tiny");
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[tokio::test]
async fn http_error_leaves_previous_file_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let store = ImageStore::new(dir.path().join("background.png"));
    std::fs::write(store.path(), b"keep me").unwrap();

    let err = store
        .save(&format!("{}/gone.png", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, AtelierError::Download { ref message, .. } if message == "HTTP 404"));
    assert_eq!(std::fs::read(store.path()).unwrap(), b"keep me");
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let server = MockServer::start().await;
    serve(&server, "/empty.png", b"").await;
    let dir = TempDir::new().unwrap();
    let store = ImageStore::new(dir.path().join("background.png"));

    let err = store
        .save(&format!("{}/empty.png", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, AtelierError::Download { .. }));
    assert!(!store.path().exists());
}
