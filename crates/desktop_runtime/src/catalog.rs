//! Validating boundary in front of [`WindowStore`].
//!
//! The store itself treats unknown ids as silent no-ops. Hosts that want unknown ids reported
//! (for example, ids arriving from deep links or shell commands) route actions through
//! [`CatalogGuard`] instead.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{WindowConfig, WindowId};
use crate::reducer::{WindowAction, WindowEffect};
use crate::store::WindowStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors raised by [`CatalogGuard`] before an action reaches the store.
pub enum CatalogError {
    /// The action named a window that is not in the catalog.
    #[error("unknown window `{0}`")]
    UnknownWindow(WindowId),
}

#[derive(Debug)]
pub struct CatalogGuard {
    store: WindowStore,
    catalog: BTreeSet<WindowId>,
}

impl CatalogGuard {
    pub fn new(store: WindowStore, configs: &[WindowConfig]) -> Self {
        Self {
            store,
            catalog: configs.iter().map(|config| config.id.clone()).collect(),
        }
    }

    pub fn store(&self) -> &WindowStore {
        &self.store
    }

    pub fn into_inner(self) -> WindowStore {
        self.store
    }

    pub fn contains(&self, window_id: &WindowId) -> bool {
        self.catalog.contains(window_id)
    }

    /// Forwards `action` when every window it targets is catalogued.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownWindow`] when the action targets an uncatalogued window; the
    /// store is not touched in that case.
    pub fn dispatch(&mut self, action: WindowAction) -> Result<Vec<WindowEffect>, CatalogError> {
        if let Some(window_id) = action.window_id() {
            if !self.contains(window_id) {
                return Err(CatalogError::UnknownWindow(window_id.clone()));
            }
        }
        Ok(self.store.dispatch(action))
    }
}
