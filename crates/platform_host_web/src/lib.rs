//! Browser (`wasm32`) implementations of [`platform_host`] storage contracts.
//!
//! On non-wasm targets every adapter is inert: loads report nothing stored and writes succeed
//! without effect, so native test builds link the same code paths.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;

pub use storage::local_prefs::WebPrefsStore;

/// Returns the preference store for the current target.
pub fn prefs_store() -> WebPrefsStore {
    WebPrefsStore
}
