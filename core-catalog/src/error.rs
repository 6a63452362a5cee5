use crate::models::TrackId;
use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog source unavailable ({location}): {reason}")]
    SourceUnavailable { location: String, reason: String },

    #[error("Track not found: {id}")]
    NotFound { id: TrackId },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },
}

impl CatalogError {
    pub(crate) fn source_unavailable(location: impl Into<String>, err: &BridgeError) -> Self {
        CatalogError::SourceUnavailable {
            location: location.into(),
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
