//! Layout persistence: snapshot load/save against a durable key/value slot, plus the change
//! predicate callers use to skip redundant writes.

use std::rc::Rc;

use leptos::logging;
use platform_host::PrefsStore;
use thiserror::Error;

use crate::model::{LayoutEntry, LayoutSnapshot};

/// Storage key holding the serialized window layout.
pub const LAYOUT_STORAGE_KEY: &str = "retrodesk.window_layout.v1";

#[derive(Debug, Error)]
/// Failures writing or clearing the persisted layout.
pub enum LayoutPersistenceError {
    /// The backing key/value store rejected the operation.
    #[error("layout storage failed: {0}")]
    Storage(String),
    /// The snapshot could not be encoded as JSON.
    #[error("layout encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reads and writes one layout slot in a [`PrefsStore`].
#[derive(Clone)]
pub struct LayoutPersistence {
    store: Rc<dyn PrefsStore>,
    key: String,
}

impl std::fmt::Debug for LayoutPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl LayoutPersistence {
    pub fn new(store: Rc<dyn PrefsStore>) -> Self {
        Self::with_key(store, LAYOUT_STORAGE_KEY)
    }

    pub fn with_key(store: Rc<dyn PrefsStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the stored snapshot.
    ///
    /// Missing data, storage failures, and content that is not a list of layout entries all read
    /// as "no prior layout".
    pub fn load(&self) -> Option<LayoutSnapshot> {
        let raw = match self.store.load_pref(&self.key) {
            Ok(raw) => raw?,
            Err(err) => {
                logging::warn!("layout load failed: {err}");
                return None;
            }
        };
        parse_layout_snapshot(&raw)
    }

    /// Writes `snapshot`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutPersistenceError`] when encoding or the storage write fails.
    pub fn save(&self, snapshot: &[LayoutEntry]) -> Result<(), LayoutPersistenceError> {
        let raw = serde_json::to_string(snapshot)?;
        self.store
            .save_pref(&self.key, &raw)
            .map_err(LayoutPersistenceError::Storage)
    }

    /// Removes the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutPersistenceError::Storage`] when the storage delete fails.
    pub fn clear(&self) -> Result<(), LayoutPersistenceError> {
        self.store
            .delete_pref(&self.key)
            .map_err(LayoutPersistenceError::Storage)
    }
}

/// Parses a serialized snapshot, returning `None` for anything that is not a list of entries.
pub fn parse_layout_snapshot(raw: &str) -> Option<LayoutSnapshot> {
    serde_json::from_str::<LayoutSnapshot>(raw).ok()
}

/// Returns `true` when `next` differs from `prev` in any persisted field.
///
/// An absent `is_maximized` compares equal to `false`; an absent `size` differs from any present
/// size.
pub fn should_persist_layout(prev: &[LayoutEntry], next: &[LayoutEntry]) -> bool {
    prev.len() != next.len() || prev.iter().zip(next).any(|(a, b)| entry_differs(a, b))
}

fn entry_differs(a: &LayoutEntry, b: &LayoutEntry) -> bool {
    a.id != b.id
        || a.z_index != b.z_index
        || a.is_open != b.is_open
        || a.is_minimized != b.is_minimized
        || a.is_maximized.unwrap_or(false) != b.is_maximized.unwrap_or(false)
        || a.position != b.position
        || a.size != b.size
}

/// Remembers the last written snapshot so repeated persistence requests only write on change.
///
/// Scheduling (debounce, idle callbacks) stays with the caller.
#[derive(Debug, Clone, Default)]
pub struct LayoutPersistGate {
    last_written: Option<LayoutSnapshot>,
}

impl LayoutPersistGate {
    /// Starts from a snapshot already known to be in storage (for example, the one loaded at boot).
    pub fn primed(snapshot: LayoutSnapshot) -> Self {
        Self {
            last_written: Some(snapshot),
        }
    }

    pub fn needs_write(&self, next: &[LayoutEntry]) -> bool {
        match &self.last_written {
            Some(prev) => should_persist_layout(prev, next),
            None => true,
        }
    }

    pub fn mark_written(&mut self, snapshot: LayoutSnapshot) {
        self.last_written = Some(snapshot);
    }

    pub fn last_written(&self) -> Option<&[LayoutEntry]> {
        self.last_written.as_deref()
    }
}
