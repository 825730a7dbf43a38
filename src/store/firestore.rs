// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed user record store.
//!
//! Records live in the `users` collection keyed by subject id, with the
//! `results`, `gender` and `units` fields written independently via
//! field-masked updates. A save never touches the other fields and never
//! checks what it overwrites.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{UserRecord, Wods};
use crate::store::{collections, StorageBackend};

/// Firestore client wrapper.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Connect to Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator takes any bearer token; skip real credential lookup.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::connect_emulator(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Store(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn connect_emulator(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Store(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// One-shot read of a subject's whole record.
    async fn record(&self, user_uid: &str) -> Result<Option<UserRecord>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_uid)
            .await
            .map_err(|e| AppError::Store(e.to_string()))
    }

    /// Overwrite the masked fields of a subject's record.
    async fn write_masked(
        &self,
        user_uid: &str,
        record: &UserRecord,
        mask: Vec<String>,
    ) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .fields(mask)
            .in_col(collections::USERS)
            .document_id(user_uid)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FirestoreStore {
    async fn load_results(&self, user_uid: &str) -> Result<Option<Wods>, AppError> {
        Ok(self.record(user_uid).await?.and_then(|r| r.results))
    }

    async fn save_results(&self, user_uid: &str, wods: &Wods) -> Result<(), AppError> {
        let record = UserRecord {
            results: Some(wods.clone()),
            ..Default::default()
        };
        self.write_masked(user_uid, &record, firestore::paths!(UserRecord::{results}))
            .await
    }

    async fn load_gender(&self, user_uid: &str) -> Result<Option<String>, AppError> {
        Ok(self.record(user_uid).await?.and_then(|r| r.gender))
    }

    async fn save_gender(&self, user_uid: &str, gender: &str) -> Result<(), AppError> {
        let record = UserRecord {
            gender: Some(gender.to_string()),
            ..Default::default()
        };
        self.write_masked(user_uid, &record, firestore::paths!(UserRecord::{gender}))
            .await
    }

    async fn load_units(&self, user_uid: &str) -> Result<Option<String>, AppError> {
        Ok(self.record(user_uid).await?.and_then(|r| r.units))
    }

    async fn save_units(&self, user_uid: &str, units: &str) -> Result<(), AppError> {
        let record = UserRecord {
            units: Some(units.to_string()),
            ..Default::default()
        };
        self.write_masked(user_uid, &record, firestore::paths!(UserRecord::{units}))
            .await
    }
}
