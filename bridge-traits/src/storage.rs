//! File System Abstraction
//!
//! Read-only file access used to load local catalogs. Hosts that sandbox
//! file access (mobile document pickers, browser file handles) implement
//! this trait instead of letting the core touch paths directly.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use crate::error::Result;

/// File system access trait
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn load(fs: &dyn FileSystemAccess, path: &Path) -> Result<Bytes> {
///     fs.read_file(path).await
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Read entire file contents into memory
    ///
    /// # Errors
    ///
    /// `BridgeError::Io` when the file is missing or unreadable.
    async fn read_file(&self, path: &Path) -> Result<Bytes>;
}
