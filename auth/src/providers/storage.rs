//! Durable storage trait.

use crate::error::StorageError;

/// Durable string key/value storage.
///
/// Every key is independently settable and clearable. Calls are
/// synchronous: they complete before the mutating session operation
/// returns, so a restart observes every committed mutation.
pub trait SessionStorage: Send + Sync {
    /// Read a key.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a key.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Clear a key. Clearing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
