//! Persistence for the board state
//!
//! The whole [`RootState`] lives in one named slot as JSON. A slot is a raw
//! key-value cell ([`Slot`]); [`Persistence`] layers the best-effort policy on
//! top of it:
//!
//! - `load` treats a missing slot and malformed JSON the same way: the caller
//!   gets `None` and falls back to the seed state. A slot that cannot be read
//!   at all (I/O error, lock timeout) is an error, so a board that exists is
//!   never replaced by the seed.
//! - `save` never fails. Serialization and write errors are logged and the
//!   in-memory state stays as it is, so memory and disk may diverge until
//!   the next successful save.
//!
//! # Directory Structure
//!
//! ```text
//! <data_dir>/
//!   taskdeck.toml               # Optional configuration
//!   taskManagerState.json       # Persisted root state
//!   taskManagerState.json.lock  # Sidecar lock, held per CLI invocation
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::model::RootState;

/// Default slot name
pub const DEFAULT_SLOT: &str = "taskManagerState";

/// A single named key-value cell holding serialized state.
pub trait Slot {
    /// Slot name, used in log fields.
    fn name(&self) -> &str;

    /// Raw slot content, or `None` if nothing was ever written.
    fn read(&self) -> Result<Option<String>>;

    /// Overwrite the slot.
    fn write(&self, content: &str) -> Result<()>;
}

/// Slot backed by `<dir>/<name>.json`.
///
/// By default each read and write takes the sidecar lock on its own. After
/// [`FileSlot::hold`] the lock is held until the last clone is dropped, so a
/// whole load, act, save sequence runs without another process interleaving.
#[derive(Debug, Clone)]
pub struct FileSlot {
    name: String,
    path: PathBuf,
    lock_timeout_ms: u64,
    held: Option<Arc<FileLock>>,
}

impl FileSlot {
    pub fn new(dir: impl AsRef<Path>, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = dir.as_ref().join(format!("{name}.json"));
        Self {
            name,
            path,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            held: None,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    /// Take the sidecar lock now and keep it for the life of this slot.
    pub fn hold(mut self) -> Result<Self> {
        if self.held.is_none() {
            let lock = FileLock::acquire(lock::lock_path_for(&self.path), self.lock_timeout_ms)?;
            tracing::debug!(lock = %lock.path().display(), "holding board lock");
            self.held = Some(Arc::new(lock));
        }
        Ok(self)
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    /// Path to the JSON file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Slot for FileSlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<Option<String>> {
        let bytes = if self.is_held() {
            lock::read_if_exists(&self.path)?
        } else {
            lock::read_locked(&self.path, self.lock_timeout_ms)?
        };
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        let content = String::from_utf8(bytes).map_err(|err| {
            Error::OperationFailed(format!("{} is not valid UTF-8: {err}", self.path.display()))
        })?;
        Ok(Some(content))
    }

    fn write(&self, content: &str) -> Result<()> {
        if self.is_held() {
            lock::write_atomic(&self.path, content.as_bytes())
        } else {
            lock::write_atomic_locked(&self.path, content.as_bytes(), self.lock_timeout_ms)
        }
    }
}

/// In-process slot. Clones share the same cell.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    inner: Arc<Mutex<MemoryCell>>,
}

#[derive(Debug, Default)]
struct MemoryCell {
    content: Option<String>,
    fail_writes: bool,
    writes: usize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        let slot = Self::default();
        slot.inner.lock().content = Some(content.into());
        slot
    }

    /// Make subsequent writes fail, like a full storage quota.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }

    pub fn content(&self) -> Option<String> {
        self.inner.lock().content.clone()
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.inner.lock().writes
    }
}

impl Slot for MemorySlot {
    fn name(&self) -> &str {
        DEFAULT_SLOT
    }

    fn read(&self) -> Result<Option<String>> {
        Ok(self.inner.lock().content.clone())
    }

    fn write(&self, content: &str) -> Result<()> {
        let mut cell = self.inner.lock();
        if cell.fail_writes {
            return Err(Error::OperationFailed("storage quota exceeded".to_string()));
        }
        cell.content = Some(content.to_string());
        cell.writes += 1;
        Ok(())
    }
}

/// Best-effort JSON persistence over a [`Slot`].
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    slot: S,
}

impl<S: Slot> Persistence<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Read the persisted state.
    ///
    /// A missing slot or malformed JSON is `Ok(None)`. A slot that exists
    /// but cannot be read is returned as the error.
    pub fn load(&self) -> Result<Option<RootState>> {
        let Some(raw) = self.slot.read()? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(err) => {
                tracing::warn!(slot = self.slot.name(), error = %err, "error loading state");
                Ok(None)
            }
        }
    }

    /// Write the full state; failures are logged, never returned.
    pub fn save(&self, state: &RootState) {
        if let Err(err) = self.try_save(state) {
            tracing::warn!(slot = self.slot.name(), error = %err, "error saving state");
        }
    }

    fn try_save(&self, state: &RootState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.slot.write(&json)
    }
}
