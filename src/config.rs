// SPDX-License-Identifier: MPL-2.0

use std::env;
use std::time::Duration;
use tracing::{info, warn};

pub const APP_NAME: &str = "Trash Transit";
/// Directory name under the platform data dir
pub const APP_DIR: &str = "trash-transit";

#[cfg(feature = "devel")]
pub const IS_DEVEL: bool = true;
#[cfg(not(feature = "devel"))]
pub const IS_DEVEL: bool = false;

pub const DEFAULT_BACKEND: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Number of comments the server returns for a full page
pub const PAGE_SIZE: usize = 10;

pub const MAX_COMMENT_CHARS: usize = 140;
pub const MIN_REPORT_REASON_CHARS: usize = 5;
/// Two days
pub const MAX_WAIT_MINUTES: u32 = 2880;

const BACKEND_VAR: &str = "TRASH_TRANSIT_BACKEND";
const TIMEOUT_VAR: &str = "TRASH_TRANSIT_TIMEOUT_SECS";

/// Where and how to reach the backend API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    /// Read overrides from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let base_url = env::var(BACKEND_VAR).unwrap_or_else(|_| {
            info!("{BACKEND_VAR} not set, using default: {DEFAULT_BACKEND}");
            DEFAULT_BACKEND.to_string()
        });

        let timeout_secs = match env::var(TIMEOUT_VAR) {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
                warn!("Invalid {TIMEOUT_VAR} value {raw:?}: {e}");
                DEFAULT_TIMEOUT_SECS
            }),
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn with_base(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
