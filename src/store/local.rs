// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local fallback store, the browser-storage analog.
//!
//! Values live under fixed keys in a single JSON file. The subject id is
//! accepted and ignored: this variant predates per-subject paths and there
//! is no migration between the two schemes. A missing file loads as absence.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::Wods;
use crate::store::StorageBackend;

/// On-disk shape: one object with the fixed keys.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wods: Option<Wods>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    units: Option<String>,
}

/// Single-file store. Writes serialize through a mutex; readers see whatever
/// the last completed write left behind.
pub struct LocalStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<LocalData, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Store(format!(
                    "Corrupt local store {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LocalData::default()),
            Err(e) => Err(AppError::Store(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write(&self, data: &LocalData) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Store(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let bytes = serde_json::to_vec_pretty(data)
            .map_err(|e| AppError::Store(format!("Failed to serialize local store: {}", e)))?;

        tokio::fs::write(&self.path, bytes).await.map_err(|e| {
            AppError::Store(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    /// Read-modify-write under the write lock.
    async fn update(&self, apply: impl FnOnce(&mut LocalData)) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.read().await?;
        apply(&mut data);
        self.write(&data).await
    }
}

#[async_trait]
impl StorageBackend for LocalStore {
    async fn load_results(&self, _user_uid: &str) -> Result<Option<Wods>, AppError> {
        Ok(self.read().await?.wods)
    }

    async fn save_results(&self, _user_uid: &str, wods: &Wods) -> Result<(), AppError> {
        let wods = wods.clone();
        self.update(move |data| data.wods = Some(wods)).await
    }

    async fn load_gender(&self, _user_uid: &str) -> Result<Option<String>, AppError> {
        Ok(self.read().await?.gender)
    }

    async fn save_gender(&self, _user_uid: &str, gender: &str) -> Result<(), AppError> {
        let gender = gender.to_string();
        self.update(move |data| data.gender = Some(gender)).await
    }

    async fn load_units(&self, _user_uid: &str) -> Result<Option<String>, AppError> {
        Ok(self.read().await?.units)
    }

    async fn save_units(&self, _user_uid: &str, units: &str) -> Result<(), AppError> {
        let units = units.to_string();
        self.update(move |data| data.units = Some(units)).await
    }
}
