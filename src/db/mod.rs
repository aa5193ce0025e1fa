// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key-value blob storage.
//!
//! The map UI stored its workouts under a single key in browser local
//! storage. [`BlobStore`] is that collaborator: string keys, string
//! values, whole-value writes.

pub mod file;
pub mod memory;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

use crate::error::AppError;

/// Storage key names as constants.
pub mod keys {
    /// All workouts, serialized as one JSON array.
    pub const WORKOUTS: &str = "workouts";
}

/// A durable string-keyed blob store.
///
/// `set` must replace the value atomically: a reader sees either the old
/// or the new value, never a partial write.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove one key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn remove_all(&self) -> Result<(), StorageError>;
}

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Keys become file names, so keep them to a safe alphabet.
pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
