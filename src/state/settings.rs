// SPDX-License-Identifier: MPL-2.0

use crate::store::{IdSet, KeyValueStore, StoreError};
use std::sync::Arc;

pub const PRIVACY_AND_TERMS_ACCEPTED: &str = "privacyAndTermsAccepted";
pub const LAST_CITY: &str = "city";
pub const LIKED_LIST: &str = "likedList";
pub const REPORTED_LIST: &str = "reportedList";

/// Device-local state that survives restarts: consent, last city, and the
/// comment ids this installation has upvoted or reported.
pub struct LocalState {
    store: Arc<dyn KeyValueStore>,
    liked: IdSet,
    reported: IdSet,
}

impl LocalState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            liked: IdSet::new(store.clone(), LIKED_LIST),
            reported: IdSet::new(store.clone(), REPORTED_LIST),
            store,
        }
    }

    pub fn privacy_and_terms_accepted(&self) -> Result<bool, StoreError> {
        let value = self.store.get(PRIVACY_AND_TERMS_ACCEPTED)?;
        Ok(value.as_deref() == Some("true"))
    }

    pub fn accept_privacy_and_terms(&self) -> Result<(), StoreError> {
        self.store.set(PRIVACY_AND_TERMS_ACCEPTED, "true")
    }

    pub fn last_city(&self) -> Result<Option<String>, StoreError> {
        Ok(self.store.get(LAST_CITY)?.filter(|city| !city.is_empty()))
    }

    pub fn remember_city(&self, city: &str) -> Result<(), StoreError> {
        self.store.set(LAST_CITY, city)
    }

    /// Last used city, but only while the backend still lists it
    pub fn preferred_city(&self, known: &[String]) -> Option<String> {
        let city = self.last_city().ok().flatten()?;
        known.contains(&city).then_some(city)
    }

    pub fn liked(&self) -> &IdSet {
        &self.liked
    }

    pub fn reported(&self) -> &IdSet {
        &self.reported
    }
}
