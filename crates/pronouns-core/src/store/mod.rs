//! In-memory label map with debounced persistence.
//!
//! Mutations touch memory only. [`LabelStore::schedule_save`] arms a single
//! store-wide debounce timer; when it fires, one snapshot of the current map
//! is written on the blocking pool. The in-memory map is authoritative: a
//! failed save is logged and the next save writes everything again.
mod codec;
pub use codec::{decode_label, decode_map, encode_map};

mod error;
pub use error::{StoreError, StoreResult};

mod storage;
pub use storage::{FileStorage, MemoryStorage, Storage};

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use parking_lot::{Mutex, RwLock};
use pronouns_model::{LabelRecord, PlayerId};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

/// Default debounce window.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_secs(1);

/// Persisted content of a freshly created label file.
const EMPTY_MAP: &[u8] = b"{}";

/// Persistence settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Debounce window between the first `schedule_save` and the write.
    pub save_delay: Duration,
    /// When `false`, `schedule_save` does nothing; only `flush_sync` writes.
    pub auto_save: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            save_delay: DEFAULT_SAVE_DELAY,
            auto_save: true,
        }
    }
}

struct Inner {
    records: RwLock<HashMap<PlayerId, LabelRecord>>,
    storage: Arc<dyn Storage>,
    cfg: StoreConfig,
    save_pending: AtomicBool,
    // Serializes snapshot + write so a late debounced save never lands after the final flush.
    io: Mutex<()>,
    closed: CancellationToken,
    runtime: Handle,
}

impl Inner {
    fn snapshot(&self) -> HashMap<PlayerId, LabelRecord> {
        self.records.read().clone()
    }

    fn write_snapshot(&self) -> StoreResult<usize> {
        let snapshot = self.snapshot();
        let bytes = encode_map(&snapshot)?;
        self.storage.write_blocking(&bytes)?;
        Ok(bytes.len())
    }

    fn debounced_save(&self) {
        let _io = self.io.lock();
        if self.closed.is_cancelled() {
            return;
        }
        match self.write_snapshot() {
            Ok(bytes) => debug!(bytes, location = %self.storage.describe(), "labels saved"),
            Err(e) => error!(
                error = %e,
                location = %self.storage.describe(),
                "failed to save labels; will retry on next save"
            ),
        }
    }
}

/// Concurrent player → label map backed by a [`Storage`].
///
/// Cloning is cheap and every clone shares the same map and debounce state.
#[derive(Clone)]
pub struct LabelStore {
    inner: Arc<Inner>,
}

impl LabelStore {
    /// Load the map from `storage`.
    ///
    /// Missing content yields an empty store and writes an empty mapping;
    /// malformed content is returned as [`StoreError::Corrupt`].
    ///
    /// Must be called from within a tokio runtime: later saves are spawned on it.
    pub async fn load(storage: Arc<dyn Storage>, cfg: StoreConfig) -> StoreResult<Self> {
        let records = match storage.read().await? {
            Some(bytes) => {
                let content =
                    String::from_utf8(bytes).map_err(|e| StoreError::Corrupt(e.to_string()))?;
                decode_map(&content)?
            }
            None => {
                storage.write(EMPTY_MAP.to_vec()).await?;
                info!(location = %storage.describe(), "created empty label file");
                HashMap::new()
            }
        };
        info!(entries = records.len(), location = %storage.describe(), "labels loaded");

        Ok(Self {
            inner: Arc::new(Inner {
                records: RwLock::new(records),
                storage,
                cfg,
                save_pending: AtomicBool::new(false),
                io: Mutex::new(()),
                closed: CancellationToken::new(),
                runtime: Handle::current(),
            }),
        })
    }

    /// Load from a JSON file at `path`.
    pub async fn open(path: impl Into<PathBuf>, cfg: StoreConfig) -> StoreResult<Self> {
        Self::load(Arc::new(FileStorage::new(path)), cfg).await
    }

    pub fn get(&self, id: &PlayerId) -> Option<LabelRecord> {
        self.inner.records.read().get(id).cloned()
    }

    /// Insert or replace; returns the previous record.
    pub fn set(&self, id: PlayerId, record: LabelRecord) -> Option<LabelRecord> {
        trace!(player = %id, tag = %record.tag(), "label set");
        self.inner.records.write().insert(id, record)
    }

    /// Delete; returns the removed record.
    pub fn remove(&self, id: &PlayerId) -> Option<LabelRecord> {
        trace!(player = %id, "label removed");
        self.inner.records.write().remove(id)
    }

    pub fn len(&self) -> usize {
        self.inner.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.read().is_empty()
    }

    /// Point-in-time copy of the whole map.
    pub fn snapshot(&self) -> HashMap<PlayerId, LabelRecord> {
        self.inner.snapshot()
    }

    /// `true` while a debounced save is armed or writing.
    pub fn is_save_pending(&self) -> bool {
        self.inner.save_pending.load(Ordering::Acquire)
    }

    /// Arm the debounce timer unless a save is already pending.
    ///
    /// Returns `true` if this call armed the timer. The eventual write
    /// reflects the map as it is when the timer fires.
    pub fn schedule_save(&self) -> bool {
        if !self.inner.cfg.auto_save || self.inner.closed.is_cancelled() {
            return false;
        }
        if self
            .inner
            .save_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            trace!("save already pending");
            return false;
        }

        let inner = Arc::clone(&self.inner);
        self.inner.runtime.spawn(async move {
            tokio::select! {
                _ = inner.closed.cancelled() => {
                    inner.save_pending.store(false, Ordering::Release);
                    return;
                }
                _ = tokio::time::sleep(inner.cfg.save_delay) => {}
            }

            let worker = Arc::clone(&inner);
            if let Err(e) = tokio::task::spawn_blocking(move || worker.debounced_save()).await {
                error!(error = %e, "label save worker failed");
            }
            inner.save_pending.store(false, Ordering::Release);
        });
        debug!(delay_ms = self.inner.cfg.save_delay.as_millis() as u64, "save scheduled");
        true
    }

    /// Write the current map right now on the calling thread.
    pub fn flush_sync(&self) -> StoreResult<()> {
        let _io = self.inner.io.lock();
        let bytes = self.inner.write_snapshot()?;
        info!(bytes, location = %self.inner.storage.describe(), "labels flushed");
        Ok(())
    }

    /// Drop any pending debounced save and flush synchronously.
    ///
    /// After `close`, `schedule_save` is a no-op; `flush_sync` still works.
    pub fn close(&self) -> StoreResult<()> {
        self.inner.closed.cancel();
        self.flush_sync()
    }
}

impl std::fmt::Debug for LabelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelStore")
            .field("entries", &self.len())
            .field("location", &self.inner.storage.describe())
            .field("save_pending", &self.is_save_pending())
            .finish()
    }
}
