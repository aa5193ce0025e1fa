// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence of the workout store to a durable blob store.
//!
//! A single writer task owns the [`BlobStore`] and applies requests in the
//! order they were submitted, so a load always observes every save queued
//! before it. Saves return a [`SaveHandle`] the caller may await for the
//! outcome or simply drop.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, oneshot};

use crate::db::BlobStore;
use crate::error::{AppError, Result};
use crate::services::store::WorkoutStore;

enum Command {
    Save {
        blob: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Remove {
        reply: oneshot::Sender<Result<()>>,
    },
    Load {
        reply: oneshot::Sender<Result<Option<String>>>,
    },
}

/// Completion of a queued write. Resolves once the blob store has applied it.
#[must_use = "a dropped SaveHandle still completes, but its outcome is only logged"]
pub struct SaveHandle {
    rx: oneshot::Receiver<Result<()>>,
}

impl SaveHandle {
    fn failed(err: AppError) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Err(err));
        Self { rx }
    }
}

impl Future for SaveHandle {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|reply| {
            reply.unwrap_or_else(|_| Err(AppError::Storage("Persistence writer stopped".to_string())))
        })
    }
}

/// Handle to the persistence writer. Cheap to clone.
#[derive(Clone)]
pub struct PersistenceAdapter {
    tx: mpsc::UnboundedSender<Command>,
    key: Arc<str>,
}

impl PersistenceAdapter {
    /// Start the writer task for `blob_store`, persisting under `key`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(blob_store: Arc<dyn BlobStore>, key: &str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let key: Arc<str> = Arc::from(key);
        tokio::spawn(run_writer(blob_store, key.clone(), rx));
        Self { tx, key }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize the whole store now and queue the write.
    pub fn save(&self, store: &WorkoutStore) -> SaveHandle {
        let blob = match store.serialize() {
            Ok(blob) => blob,
            Err(e) => return SaveHandle::failed(e),
        };
        tracing::debug!(key = %self.key, count = store.len(), "Queueing workout save");
        self.submit(|reply| Command::Save { blob, reply })
    }

    /// Queue removal of the persisted workouts.
    pub fn clear(&self) -> SaveHandle {
        tracing::debug!(key = %self.key, "Queueing workout removal");
        self.submit(|reply| Command::Remove { reply })
    }

    fn submit(&self, command: impl FnOnce(oneshot::Sender<Result<()>>) -> Command) -> SaveHandle {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(command(reply)).is_err() {
            return SaveHandle::failed(AppError::Storage(
                "Persistence writer stopped".to_string(),
            ));
        }
        SaveHandle { rx }
    }

    /// Load the persisted store.
    ///
    /// Absent data yields an empty store. So does a blob that cannot be
    /// decoded, or a storage failure: both are logged, never returned.
    pub async fn load(&self) -> WorkoutStore {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::Load { reply }).is_err() {
            tracing::error!(key = %self.key, "Persistence writer stopped; starting empty");
            return WorkoutStore::new();
        }

        let blob = match rx.await {
            Ok(Ok(Some(blob))) => blob,
            Ok(Ok(None)) => {
                tracing::info!(key = %self.key, "No stored workouts");
                return WorkoutStore::new();
            }
            Ok(Err(e)) => {
                tracing::error!(key = %self.key, error = %e, "Failed to read stored workouts; starting empty");
                return WorkoutStore::new();
            }
            Err(_) => {
                tracing::error!(key = %self.key, "Persistence writer stopped; starting empty");
                return WorkoutStore::new();
            }
        };

        match WorkoutStore::deserialize(&blob) {
            Ok(store) => {
                tracing::info!(key = %self.key, count = store.len(), "Loaded stored workouts");
                store
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Ignoring malformed stored workouts");
                WorkoutStore::new()
            }
        }
    }
}

async fn run_writer(
    blob_store: Arc<dyn BlobStore>,
    key: Arc<str>,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Save { blob, reply } => {
                let store = blob_store.clone();
                let k = key.clone();
                let result = blocking(move || store.set(&k, &blob)).await;
                if let Err(e) = &result {
                    tracing::error!(key = %key, error = %e, "Failed to save workouts");
                }
                let _ = reply.send(result);
            }
            Command::Remove { reply } => {
                let store = blob_store.clone();
                let k = key.clone();
                let result = blocking(move || store.remove(&k)).await;
                if let Err(e) = &result {
                    tracing::error!(key = %key, error = %e, "Failed to remove workouts");
                }
                let _ = reply.send(result);
            }
            Command::Load { reply } => {
                let store = blob_store.clone();
                let k = key.clone();
                let _ = reply.send(blocking(move || store.get(&k)).await);
            }
        }
    }
    tracing::debug!(key = %key, "Persistence writer stopped");
}

/// Run a blob store call on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, crate::db::StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Storage task failed: {e}")))?
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{keys, MemoryBlobStore};
    use crate::models::{Coords, Workout, WorkoutType};
    use chrono::Utc;

    fn adapter() -> (PersistenceAdapter, MemoryBlobStore) {
        let blobs = MemoryBlobStore::new();
        (
            PersistenceAdapter::spawn(Arc::new(blobs.clone()), keys::WORKOUTS),
            blobs,
        )
    }

    fn one_run() -> WorkoutStore {
        let mut store = WorkoutStore::new();
        let now = Utc::now();
        let id = store.next_id(now);
        store
            .add(
                Workout::create(
                    id,
                    WorkoutType::Running,
                    Coords(39.0, -12.0),
                    5.2,
                    24.0,
                    178.0,
                    now,
                )
                .unwrap(),
            )
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_absent_blob_loads_empty() {
        let (adapter, _) = adapter();
        assert!(adapter.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (adapter, blobs) = adapter();
        let store = one_run();

        adapter.save(&store).await.unwrap();

        assert!(blobs.get(keys::WORKOUTS).unwrap().is_some());
        assert_eq!(adapter.load().await, store);
    }

    #[tokio::test]
    async fn test_dropped_save_is_seen_by_next_load() {
        let (adapter, _) = adapter();
        let store = one_run();

        drop(adapter.save(&store));

        assert_eq!(adapter.load().await, store);
    }

    #[tokio::test]
    async fn test_malformed_blob_loads_empty() {
        let (adapter, blobs) = adapter();
        blobs.set(keys::WORKOUTS, "{not json").unwrap();
        assert!(adapter.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_removes_key() {
        let (adapter, blobs) = adapter();
        adapter.save(&one_run()).await.unwrap();
        adapter.clear().await.unwrap();
        assert!(blobs.is_empty());
        assert!(adapter.load().await.is_empty());
    }
}
