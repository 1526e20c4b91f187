use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use solace::api::ApiClient;
use solace::config::ApiConfig;
use solace::storage::{KeyValueStore, MemoryStore, SledStore};

#[allow(dead_code)]
pub fn create_temp_store() -> (Arc<SledStore>, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store = SledStore::open(tmp.path().join("store")).expect("failed to open sled store");
    (Arc::new(store), tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Client pointed at a mock server, with its own in-memory token store
#[allow(dead_code)]
pub fn client_for(base_url: &str) -> (ApiClient, Arc<dyn KeyValueStore>) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        ..Default::default()
    };
    let client = ApiClient::new(&config, store.clone()).expect("failed to build client");
    (client, store)
}
