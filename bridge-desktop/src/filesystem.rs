//! File System Access Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::FileSystemAccess,
};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Tokio-based file system implementation
///
/// Relative paths are resolved against an optional base directory, which
/// lets a host point the core at the folder a bundled catalog ships in.
#[derive(Debug, Clone, Default)]
pub struct TokioFileSystem {
    base_dir: Option<PathBuf>,
}

impl TokioFileSystem {
    /// Create a file system accessor that resolves paths as given
    pub fn new() -> Self {
        Self { base_dir: None }
    }

    /// Create a file system accessor that resolves relative paths against `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Convert std::io::Error to BridgeError
    fn map_io_error(e: std::io::Error) -> BridgeError {
        BridgeError::Io(e)
    }
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Bytes> {
        let resolved = self.resolve(path);
        let data = fs::read(&resolved).await.map_err(Self::map_io_error)?;
        debug!(path = ?resolved, size = data.len(), "Read file");
        Ok(Bytes::from(data))
    }
}
