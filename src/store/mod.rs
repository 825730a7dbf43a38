//! Storage backends for user records.

pub mod firestore;
pub mod local;

pub use firestore::FirestoreStore;
pub use local::LocalStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{BackendKind, Config};
use crate::error::AppError;
use crate::models::Wods;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Persistence capability behind the port boundary.
///
/// Saves are unconditional overwrites of a single field; loads are
/// independent one-shot reads with no ordering or atomicity between them.
/// Absence means the field was never saved, not an empty value.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn load_results(&self, user_uid: &str) -> Result<Option<Wods>, AppError>;
    async fn save_results(&self, user_uid: &str, wods: &Wods) -> Result<(), AppError>;

    async fn load_gender(&self, user_uid: &str) -> Result<Option<String>, AppError>;
    async fn save_gender(&self, user_uid: &str, gender: &str) -> Result<(), AppError>;

    async fn load_units(&self, user_uid: &str) -> Result<Option<String>, AppError>;
    async fn save_units(&self, user_uid: &str, units: &str) -> Result<(), AppError>;
}

/// Construct the backend selected by the configuration.
///
/// Called once at startup; the choice is fixed for the process lifetime.
pub async fn from_config(config: &Config) -> Result<Arc<dyn StorageBackend>, AppError> {
    match config.storage_backend {
        BackendKind::Remote => Ok(Arc::new(
            FirestoreStore::new(&config.gcp_project_id).await?,
        )),
        BackendKind::Local => Ok(Arc::new(LocalStore::new(
            config.local_store_path.clone(),
        ))),
    }
}
