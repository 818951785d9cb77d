// SPDX-License-Identifier: MPL-2.0

use crate::api::ApiError;
use crate::store::StoreError;
use crate::validate::ValidationError;
use thiserror::Error;

const CONNECTION_MESSAGE: &str = "Oops! There was a problem connecting to the server.";
const SERVER_MESSAGE: &str = "Oops! There was a problem on our end. Please try again.";
const STORAGE_MESSAGE: &str = "Oops! We couldn't save that on this device. Please try again.";

/// Failure of a user-triggered operation. Terminal: nothing retries it.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    /// Text for the generic alert, or the inline field message for validation
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Api(ApiError::Network(_)) => CONNECTION_MESSAGE.to_string(),
            AppError::Api(_) => SERVER_MESSAGE.to_string(),
            AppError::Store(_) => STORAGE_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_and_server_errors_read_differently() {
        let network = AppError::from(ApiError::Network("refused".into()));
        let server = AppError::from(ApiError::Status(502));
        assert_eq!(network.user_message(), CONNECTION_MESSAGE);
        assert_eq!(server.user_message(), SERVER_MESSAGE);
    }

    #[test]
    fn test_validation_message_is_inline_text() {
        let err = AppError::from(ValidationError::MissingCity);
        assert_eq!(err.user_message(), "Please provide a city.");
    }
}
