// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore store integration tests.
//!
//! These tests require the Firestore emulator to be running; set
//! FIRESTORE_EMULATOR_HOST to enable them. The emulator provides a clean
//! state for each test run.

use std::collections::BTreeMap;

use wodboard_shell::models::Wods;
use wodboard_shell::store::{FirestoreStore, StorageBackend};

mod common;

/// Generate a unique subject id for test isolation.
fn unique_uid() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    format!(
        "test-{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

async fn test_store() -> FirestoreStore {
    FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

fn sample_wods() -> Wods {
    let mut wods = BTreeMap::new();
    wods.insert("fran".to_string(), "2:35".to_string());
    wods
}

#[tokio::test]
async fn test_results_roundtrip() {
    require_emulator!();

    let store = test_store().await;
    let uid = unique_uid();

    assert_eq!(store.load_results(&uid).await.unwrap(), None);

    store.save_results(&uid, &sample_wods()).await.unwrap();
    assert_eq!(store.load_results(&uid).await.unwrap(), Some(sample_wods()));
}

#[tokio::test]
async fn test_save_overwrites_not_merges() {
    require_emulator!();

    let store = test_store().await;
    let uid = unique_uid();

    store.save_results(&uid, &sample_wods()).await.unwrap();

    let mut second = Wods::new();
    second.insert("fran".to_string(), "3:00".to_string());
    second.insert("helen".to_string(), "12:10".to_string());
    store.save_results(&uid, &second).await.unwrap();

    // Exactly the second mapping, not a union.
    assert_eq!(store.load_results(&uid).await.unwrap(), Some(second));
}

#[tokio::test]
async fn test_empty_mapping_overwrites() {
    require_emulator!();

    let store = test_store().await;
    let uid = unique_uid();

    store.save_results(&uid, &sample_wods()).await.unwrap();
    store.save_results(&uid, &Wods::new()).await.unwrap();

    assert_eq!(store.load_results(&uid).await.unwrap(), Some(Wods::new()));
}

#[tokio::test]
async fn test_fields_are_independent() {
    require_emulator!();

    let store = test_store().await;
    let uid = unique_uid();

    store.save_results(&uid, &sample_wods()).await.unwrap();
    store.save_gender(&uid, "female").await.unwrap();
    store.save_units(&uid, "metric").await.unwrap();

    // A field-masked save never touches the other fields.
    assert_eq!(store.load_results(&uid).await.unwrap(), Some(sample_wods()));
    assert_eq!(
        store.load_gender(&uid).await.unwrap(),
        Some("female".to_string())
    );
    assert_eq!(
        store.load_units(&uid).await.unwrap(),
        Some("metric".to_string())
    );
}

#[tokio::test]
async fn test_subjects_are_isolated() {
    require_emulator!();

    let store = test_store().await;
    let uid_a = unique_uid();
    let uid_b = unique_uid();

    store.save_results(&uid_a, &sample_wods()).await.unwrap();

    assert_eq!(store.load_results(&uid_b).await.unwrap(), None);
    assert_eq!(store.load_gender(&uid_a).await.unwrap(), None);
}
