//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use hastebin_server::config::StoreKind;
use hastebin_server::statics::load_static_documents;
use hastebin_server::store::open_store;
use hastebin_server::{create_app, AppState, Config};
use std::path::Path;
use tempfile::TempDir;

pub(crate) fn test_config_for_data_path(data_path: &Path) -> Config {
    Config {
        port: 0,
        data_path: data_path.to_str().expect("data path").to_string(),
        max_length: 10,
        key_length: 5,
        store: StoreKind::Redb,
        ..Config::default()
    }
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    let store = open_store(&config).expect("open store");
    load_static_documents(store.as_ref(), &config.documents);
    let state = AppState::new(config, store);
    let app = create_app(state, false);
    TestServer::new(app).expect("server")
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config_for_data_path(&temp_dir.path().join("data"));
    (test_server_for_config(config), temp_dir)
}
