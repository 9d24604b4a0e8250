//! Lightweight preference storage contracts and adapters.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Host service for lightweight preference values (JSON stored as text per key).
///
/// Calls complete synchronously; hosts with asynchronous backends are expected to front them with
/// a write-through cache.
pub trait PrefsStore {
    /// Loads a raw JSON string for a preference key.
    fn load_pref(&self, key: &str) -> Result<Option<String>, String>;

    /// Saves a raw JSON string for a preference key, replacing any previous value.
    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), String>;

    /// Deletes a preference key.
    fn delete_pref(&self, key: &str) -> Result<(), String>;
}

impl<S: PrefsStore + ?Sized> PrefsStore for Rc<S> {
    fn load_pref(&self, key: &str) -> Result<Option<String>, String> {
        (**self).load_pref(key)
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), String> {
        (**self).save_pref(key, raw_json)
    }

    fn delete_pref(&self, key: &str) -> Result<(), String> {
        (**self).delete_pref(key)
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by string.
///
/// Clones share the same backing map, so a test can keep a handle while the runtime owns another.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Returns `true` when a value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().contains_key(key)
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn delete_pref(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}
