use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] core_catalog::CatalogError),
}

impl ServiceError {
    /// True when a detail lookup named an id the catalog does not hold.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            ServiceError::Catalog(core_catalog::CatalogError::NotFound { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
