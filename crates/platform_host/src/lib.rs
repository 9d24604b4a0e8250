//! Host-domain storage contracts shared by the desktop runtime and browser adapters.
//!
//! This crate is the API-first boundary for durable key/value storage. Concrete browser adapters
//! live in `platform_host_web`; the in-memory store here backs tests and native hosts.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;

pub use storage::prefs::{MemoryPrefsStore, PrefsStore};
