// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::{mpsc, Mutex};
use wodboard_shell::adapter::{AuthEvent, PersistenceAdapter};
use wodboard_shell::config::Config;
use wodboard_shell::models::UserProfile;
use wodboard_shell::ports::{self, UiPorts};
use wodboard_shell::routes::create_router;
use wodboard_shell::services::IdentityClient;
use wodboard_shell::store::{LocalStore, StorageBackend};
use wodboard_shell::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Local store backed by a fresh temp directory.
#[allow(dead_code)]
pub fn temp_store() -> (TempDir, Arc<LocalStore>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = LocalStore::new(dir.path().join("store.json"));
    (dir, Arc::new(store))
}

/// A mounted port table with a running adapter over the given store.
#[allow(dead_code)]
pub struct TestRig {
    pub ui: UiPorts,
    pub auth: mpsc::UnboundedSender<AuthEvent>,
}

/// Mount the ports and spawn the adapter, as the binary does at startup.
#[allow(dead_code)]
pub fn spawn_adapter(store: Arc<dyn StorageBackend>) -> TestRig {
    let (adapter_ports, ui) = ports::mount();
    let (auth_tx, auth_rx) = mpsc::unbounded_channel();

    PersistenceAdapter::new(store, adapter_ports.inbound, "/auth/signin")
        .spawn(adapter_ports.commands, auth_rx);

    TestRig { ui, auth: auth_tx }
}

/// Profile for a test subject, as the identity callback would deliver it.
#[allow(dead_code)]
pub fn test_profile(user_uid: &str) -> UserProfile {
    UserProfile {
        display_name: "Test User".to_string(),
        profile_pic: None,
        identifier: "test@example.com".to_string(),
        user_uid: user_uid.to_string(),
        gender: None,
    }
}

/// Create a test app wired to a local store in a temp directory.
/// Returns the router, the shared state, and the dir keeping the store alive.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = Config::test_default();
    config.local_store_path = dir.path().join("store.json");

    let store: Arc<dyn StorageBackend> =
        Arc::new(LocalStore::new(config.local_store_path.clone()));

    let (adapter_ports, ui) = ports::mount();
    let (auth_tx, auth_rx) = mpsc::unbounded_channel();
    PersistenceAdapter::new(store, adapter_ports.inbound, "/auth/signin")
        .spawn(adapter_ports.commands, auth_rx);

    let identity = IdentityClient::new(&config);
    let state = Arc::new(AppState {
        config,
        identity,
        commands: ui.commands.clone(),
        auth_events: auth_tx,
        ui: Mutex::new(Some(ui)),
    });

    (create_router(state.clone()), state, dir)
}
