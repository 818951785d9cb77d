// SPDX-License-Identifier: MPL-2.0

//! Persistent sets of comment ids.
//!
//! Each set lives under one key as a JSON array of integers. Every write goes
//! through a read-modify-write guarded by the set's writer lock, and every
//! write de-duplicates the array while preserving first-seen order.

use crate::store::{KeyValueStore, StoreError};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

pub struct IdSet {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    writer: Mutex<()>,
}

impl IdSet {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            writer: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Ids in stored order. A missing or unreadable array is the empty set.
    pub fn load(&self) -> Result<Vec<i64>, StoreError> {
        let Some(raw) = self.store.get(self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<i64>>(&raw) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                warn!(key = self.key, "discarding malformed id list: {e}");
                Ok(Vec::new())
            }
        }
    }

    /// Point-in-time membership view. Store failures read as empty.
    pub fn snapshot(&self) -> HashSet<i64> {
        match self.load() {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                warn!(key = self.key, "failed to read id list: {e}");
                HashSet::new()
            }
        }
    }

    pub fn contains(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.load()?.contains(&id))
    }

    /// Add `id`; returns false if it was already present
    pub fn insert(&self, id: i64) -> Result<bool, StoreError> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut ids = self.load()?;
        let added = !ids.contains(&id);
        if added {
            ids.push(id);
        }
        self.save(&ids)?;
        Ok(added)
    }

    /// Drop `id`; returns false if it was not present
    pub fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut ids = self.load()?;
        let before = ids.len();
        ids.retain(|&existing| existing != id);
        let removed = ids.len() != before;
        if removed {
            self.save(&ids)?;
        }
        Ok(removed)
    }

    fn save(&self, ids: &[i64]) -> Result<(), StoreError> {
        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<i64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if unique.is_empty() {
            return self.store.remove(self.key);
        }

        let json = serde_json::to_string(&unique)?;
        self.store.set(self.key, &json)
    }
}
