//! Error types for the Google Drive provider

use bridge_traits::error::BridgeError;
use core_search::SearchError;
use thiserror::Error;

/// Google Drive provider errors
#[derive(Error, Debug)]
pub enum GoogleDriveError {
    /// The API answered with a non-success status
    #[error("Google Drive API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// 404 for the requested resource
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// No permission on the file matched the selector
    #[error("Permission not found: {0}")]
    PermissionNotFound(String),

    /// Rejected before any request was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, GoogleDriveError>;

impl GoogleDriveError {
    /// HTTP status behind the error, if the remote answered
    pub fn status(&self) -> Option<u16> {
        match self {
            GoogleDriveError::ApiError { status_code, .. } => Some(*status_code),
            GoogleDriveError::NotFound { .. } => Some(404),
            GoogleDriveError::Bridge(e) => e.status(),
            _ => None,
        }
    }
}

impl From<GoogleDriveError> for BridgeError {
    fn from(error: GoogleDriveError) -> Self {
        match error {
            GoogleDriveError::ApiError {
                status_code,
                message,
            } => BridgeError::Status {
                status: status_code,
                message,
            },
            GoogleDriveError::NotFound { resource } => BridgeError::Status {
                status: 404,
                message: format!("Not found: {}", resource),
            },
            GoogleDriveError::Bridge(e) => e,
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GoogleDriveError::ApiError {
            status_code: 403,
            message: "The user does not have sufficient permissions".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Google Drive API error (status 403): The user does not have sufficient permissions"
        );
    }

    #[test]
    fn test_conversion_keeps_status() {
        let error = GoogleDriveError::ApiError {
            status_code: 403,
            message: "Rate limit".to_string(),
        };
        let bridge_error: BridgeError = error.into();
        assert_eq!(bridge_error.status(), Some(403));

        let not_found: BridgeError = GoogleDriveError::NotFound {
            resource: "files/abc".to_string(),
        }
        .into();
        assert_eq!(not_found.status(), Some(404));
    }

    #[test]
    fn test_parse_error_becomes_operation_failed() {
        let bridge_error: BridgeError = GoogleDriveError::ParseError("bad json".into()).into();
        assert!(matches!(bridge_error, BridgeError::OperationFailed(_)));
    }
}
