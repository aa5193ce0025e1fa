// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory blob store, used by tests and ephemeral sessions.

use std::sync::Arc;

use dashmap::DashMap;

use super::{check_key, BlobStore, StorageError};

/// Blob store backed by a shared concurrent map. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.entries.remove(key);
        Ok(())
    }

    fn remove_all(&self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }
}
