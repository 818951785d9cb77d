// SPDX-License-Identifier: MPL-2.0

use crate::api::{CitiesApi, TransitClient};
use crate::board::CityBoard;
use crate::config::BackendConfig;
use crate::error::AppError;
use crate::feed::CommentFeedController;
use crate::state::LocalState;
use crate::store::SqliteStore;
use std::sync::Arc;
use tracing::info;

/// Where the app lands on launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Startup {
    /// Privacy policy and terms not accepted yet; nothing was fetched
    AwaitingConsent,
    Ready { cities: Vec<String> },
}

/// Owns the backend client and local state shared by every screen
pub struct TransitApp {
    client: Arc<TransitClient>,
    local: Arc<LocalState>,
}

impl TransitApp {
    pub fn new(client: Arc<TransitClient>, local: Arc<LocalState>) -> Self {
        Self { client, local }
    }

    /// Client for `config` over the on-disk store
    pub fn open(config: &BackendConfig) -> Result<Self, AppError> {
        let client = TransitClient::new(config)?;
        let store = SqliteStore::open_default()?;
        info!(backend = %client.base_url(), "app opened");

        Ok(Self::new(
            Arc::new(client),
            Arc::new(LocalState::new(Arc::new(store))),
        ))
    }

    pub fn local(&self) -> &Arc<LocalState> {
        &self.local
    }

    pub async fn startup(&self) -> Result<Startup, AppError> {
        if !self.local.privacy_and_terms_accepted()? {
            info!("waiting for privacy and terms consent");
            return Ok(Startup::AwaitingConsent);
        }
        let cities = self.client.list_cities().await?;
        Ok(Startup::Ready { cities })
    }

    /// Record consent and load the city list it was gating
    pub async fn accept_terms(&self) -> Result<Vec<String>, AppError> {
        self.local.accept_privacy_and_terms()?;
        info!("privacy and terms accepted");
        Ok(self.client.list_cities().await?)
    }

    pub fn comment_feed(&self) -> CommentFeedController {
        CommentFeedController::new(self.client.clone(), self.local.clone())
    }

    pub fn city_board(&self) -> CityBoard {
        CityBoard::new(self.client.clone(), self.local.clone())
    }

    pub fn preferred_city(&self, cities: &[String]) -> Option<String> {
        self.local.preferred_city(cities)
    }
}
