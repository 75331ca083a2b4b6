#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use dhub_config::ConfigManager;
use donation_hub::HubSession;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh base directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Session backed by JSON files in an isolated directory.
pub fn setup_session() -> (HubSession, ConfigManager) {
    let manager = ConfigManager::with_base_dir(temp_home()).expect("config manager");
    let session = HubSession::open(manager.clone()).expect("open session");
    (session, manager)
}
