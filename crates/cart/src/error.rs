//! Error types for the cart store and its storage backends.

use thiserror::Error;

/// Errors raised by a [`crate::storage::CartStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying device I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking storage task failed to complete.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors raised by [`crate::store::CartStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed while reading the cart blob.
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persisted cart blob exists but could not be decoded.
    #[error("malformed cart blob: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// An awaited persistence write failed.
    ///
    /// Only observable through [`crate::store::CartStore::flush`]; ordinary
    /// mutations stay best-effort and log failures instead.
    #[error("cart persistence failed: {0}")]
    Persist(String),

    /// The persistence task is no longer running.
    #[error("cart persistence task is no longer running")]
    WriterStopped,

    /// The operation was invoked through a context whose provider is gone.
    #[error(transparent)]
    OutOfScope(#[from] CartAccessError),
}

/// A [`crate::provider::CartContext`] was used after its provider was
/// dropped.
///
/// Raised synchronously at the access point with a fixed message, so a
/// misplaced context fails fast and deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cart context used outside its CartProvider scope")]
pub struct CartAccessError;
