//! Integration tests for the hastebin HTTP API.

mod support;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::TestServer;
use hastebin_server::config::StoreKind;
use hastebin_server::statics::load_static_documents;
use hastebin_server::store::open_store;
use hastebin_server::{create_app, AppState};
use serde_json::Value;
use support::{setup_test_server, test_config_for_data_path};
use tempfile::TempDir;

#[tokio::test]
async fn test_document_lifecycle() {
    let (server, _temp) = setup_test_server();

    let create_response = server.post("/documents").text("hello").await;
    assert_eq!(create_response.status_code(), StatusCode::OK);
    let created: Value = create_response.json();
    let key = created["key"].as_str().expect("key").to_string();
    assert_eq!(key.len(), 5);

    let get_response = server.get(&format!("/documents/{}", key)).await;
    assert_eq!(get_response.status_code(), StatusCode::OK);
    let document: Value = get_response.json();
    assert_eq!(document["key"], key.as_str());
    assert_eq!(document["data"], "hello");

    let raw_response = server.get(&format!("/raw/{}", key)).await;
    assert_eq!(raw_response.status_code(), StatusCode::OK);
    raw_response.assert_header("content-type", "text/plain; charset=utf-8");
    assert_eq!(raw_response.text(), "hello");
}

#[tokio::test]
async fn test_oversized_and_empty_documents_are_rejected() {
    let (server, _temp) = setup_test_server();

    for body in ["0123456789A", "this is too long", "this is way too long for ten"] {
        let response = server.post("/documents").text(body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", body);
        let error: Value = response.json();
        assert_eq!(error["kind"], "INVALID_INPUT", "{}", body);
        assert_eq!(
            error["error"], "Document exceeds maximum length of 10 bytes",
            "{}",
            body
        );
    }

    let empty = server.post("/documents").text("").await;
    assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = empty.json();
    assert_eq!(body["kind"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_non_utf8_documents_are_rejected_as_invalid_input() {
    let (server, _temp) = setup_test_server();

    let response = server
        .post("/documents")
        .bytes(Bytes::from_static(&[0xff, 0xfe, 0x41]))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_INPUT");
    assert_eq!(body["error"], "Document is not valid UTF-8");
}

#[tokio::test]
async fn test_unknown_keys_return_not_found() {
    let (server, _temp) = setup_test_server();

    for path in ["/documents/missing", "/raw/missing"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{}", path);
        let body: Value = response.json();
        assert_eq!(body["kind"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_static_documents_survive_expiry_sweep() {
    let temp_dir = TempDir::new().expect("temp dir");
    let about = temp_dir.path().join("about.md");
    std::fs::write(&about, "About us").expect("write about");

    let mut config = test_config_for_data_path(&temp_dir.path().join("data"));
    config.store = StoreKind::Memory;
    config.expire_after_secs = Some(0);
    config.documents.insert("about".to_string(), about);

    let store = open_store(&config).expect("open store");
    assert_eq!(load_static_documents(store.as_ref(), &config.documents), 1);
    let app = create_app(AppState::new(config, store.clone()), false);
    let server = TestServer::new(app).expect("server");

    let created = server.post("/documents").text("short").await;
    assert_eq!(created.status_code(), StatusCode::OK);
    let created: Value = created.json();
    let key = created["key"].as_str().expect("key").to_string();

    assert_eq!(store.purge_expired().expect("purge"), 1);

    let response = server.get("/documents/about").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let document: Value = response.json();
    assert_eq!(document["data"], "About us");
    assert_eq!(server.get("/raw/about").await.text(), "About us");

    for path in [format!("/documents/{}", key), format!("/raw/{}", key)] {
        let response = server.get(&path).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{}", path);
        let body: Value = response.json();
        assert_eq!(body["kind"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_posts_receive_unique_keys() {
    let (server, _temp) = setup_test_server();

    let mut keys = std::collections::HashSet::new();
    for i in 0..20 {
        let response = server.post("/documents").text(format!("doc {}", i)).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let created: Value = response.json();
        keys.insert(created["key"].as_str().expect("key").to_string());
    }
    assert_eq!(keys.len(), 20);
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let (server, _temp) = setup_test_server();
    let response = server.get("/documents/missing").await;
    response.assert_header("x-content-type-options", "nosniff");
    response.assert_header("x-frame-options", "DENY");
}
