// SPDX-License-Identifier: MPL-2.0

mod db;
mod id_set;
mod schema;

pub use db::SqliteStore;
pub use id_set::IdSet;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store path error: {0}")]
    Path(String),
}

/// Flat string key/value persistence for device-local state.
///
/// Implementations must be safe to share between controllers.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
