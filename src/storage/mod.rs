//! Object storage for uploaded file payloads.
//!
//! Keys are relative, `/`-separated paths such as
//! `{workspace_id}/{uuid}-{name}`. The first segment is always the owning
//! workspace, which is what `delete_prefix` relies on when a workspace goes.

mod error;
mod filesystem;
mod path;

pub use error::{StorageError, StorageResult};
pub use filesystem::FilesystemStore;
pub use path::{sanitize_file_name, storage_path, MAX_FILE_NAME_LEN};

use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `data` under `key`, replacing any existing object.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Read a whole object. Missing keys are `StorageError::NotFound`.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Remove an object. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Remove every object under `prefix`, returning how many were removed.
    async fn delete_prefix(&self, prefix: &str) -> StorageResult<usize>;

    async fn exists(&self, key: &str) -> StorageResult<bool>;
}
