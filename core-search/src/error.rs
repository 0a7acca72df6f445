//! Error types for query construction and listing

use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// Rejected before any network call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The remote listing call failed; everything accumulated was dropped
    #[error("Listing failed, {discarded} partial results discarded: {source}")]
    Transport {
        discarded: u64,
        #[source]
        source: BridgeError,
    },

    #[error("Listing cancelled, {discarded} partial results discarded")]
    Cancelled { discarded: u64 },
}

impl SearchError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        SearchError::InvalidInput(message.into())
    }

    /// Number of accumulated entities thrown away by a failed listing
    pub fn discarded(&self) -> u64 {
        match self {
            SearchError::Transport { discarded, .. } | SearchError::Cancelled { discarded } => {
                *discarded
            }
            SearchError::InvalidInput(_) => 0,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
