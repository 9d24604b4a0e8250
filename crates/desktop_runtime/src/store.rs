//! The window store: owns [`WindowManagerState`], routes every mutation through
//! [`reduce_windows`], and notifies subscribers after each change.
//!
//! Each store is an explicit instance; hosts pass it by reference to whatever owns the UI tree.
//! The store is single-writer and `!Sync`; concurrent callers must be serialized by the host event
//! loop.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use leptos::logging;
use platform_host::PrefsStore;

use crate::config::DesktopConfig;
use crate::model::{
    LayoutSnapshot, Position, Size, Viewport, WindowConfig, WindowId, WindowManagerState,
};
use crate::persistence::{LayoutPersistGate, LayoutPersistence};
use crate::reducer::{reduce_windows, WindowAction, WindowEffect};

type Listener = Rc<dyn Fn(&WindowManagerState)>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Handle returned by [`WindowStore::subscribe`]; dropping it keeps the listener registered.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<ListenerRegistry>>,
}

impl Subscription {
    /// Removes the listener. Safe to call after the store has been dropped.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

pub struct WindowStore {
    state: WindowManagerState,
    persistence: LayoutPersistence,
    listeners: Rc<RefCell<ListenerRegistry>>,
}

impl fmt::Debug for WindowStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowStore")
            .field("state", &self.state)
            .field("persistence", &self.persistence)
            .field("listeners", &self.listeners.borrow().listeners.len())
            .finish()
    }
}

impl WindowStore {
    /// Creates an uninitialized store over `prefs` with the default viewport.
    pub fn new(prefs: Rc<dyn PrefsStore>) -> Self {
        Self::with_persistence(LayoutPersistence::new(prefs), Viewport::default())
    }

    pub fn with_persistence(persistence: LayoutPersistence, viewport: Viewport) -> Self {
        Self {
            state: WindowManagerState::with_viewport(viewport),
            persistence,
            listeners: Rc::default(),
        }
    }

    /// Creates a store using the configured layout key and initial viewport.
    pub fn from_config(config: &DesktopConfig, prefs: Rc<dyn PrefsStore>) -> Self {
        Self::with_persistence(
            LayoutPersistence::with_key(prefs, config.layout_key.clone()),
            config.viewport,
        )
    }

    /// Creates a store persisting to browser `localStorage` (inert off-wasm).
    pub fn for_browser(config: &DesktopConfig) -> Self {
        Self::from_config(config, Rc::new(platform_host_web::prefs_store()))
    }

    pub fn state(&self) -> &WindowManagerState {
        &self.state
    }

    pub fn persistence(&self) -> &LayoutPersistence {
        &self.persistence
    }

    /// Registers `listener`, called with the new state after every change.
    pub fn subscribe(&self, listener: impl Fn(&WindowManagerState) + 'static) -> Subscription {
        let mut registry = self.listeners.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        let listener: Listener = Rc::new(listener);
        registry.listeners.push((id, listener));
        Subscription {
            id,
            registry: Rc::downgrade(&self.listeners),
        }
    }

    /// Applies `action`, notifying subscribers when the state changed.
    pub fn dispatch(&mut self, action: WindowAction) -> Vec<WindowEffect> {
        let before = self.state.clone();
        let effects = reduce_windows(&mut self.state, action);
        if self.state != before {
            self.notify();
        }
        effects
    }

    fn notify(&self) {
        // Snapshot the listener list so callbacks may unsubscribe while being notified.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&self.state);
        }
    }

    /// Builds the window set from `configs`, overlaying any persisted layout. No-op once initialized.
    pub fn init_windows(&mut self, configs: &[WindowConfig]) -> Vec<WindowEffect> {
        if self.state.is_initialized() {
            return Vec::new();
        }
        let saved_layout = self.persistence.load();
        self.dispatch(WindowAction::InitWindows {
            configs: configs.to_vec(),
            saved_layout,
        })
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::SetViewport { viewport })
    }

    pub fn open_window(&mut self, window_id: impl Into<WindowId>) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::OpenWindow {
            window_id: window_id.into(),
        })
    }

    pub fn close_window(&mut self, window_id: impl Into<WindowId>) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::CloseWindow {
            window_id: window_id.into(),
        })
    }

    pub fn focus_window(&mut self, window_id: impl Into<WindowId>) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::FocusWindow {
            window_id: window_id.into(),
        })
    }

    pub fn toggle_minimize(&mut self, window_id: impl Into<WindowId>) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::ToggleMinimize {
            window_id: window_id.into(),
        })
    }

    pub fn toggle_taskbar_window(&mut self, window_id: impl Into<WindowId>) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::ToggleTaskbarWindow {
            window_id: window_id.into(),
        })
    }

    pub fn move_window(
        &mut self,
        window_id: impl Into<WindowId>,
        position: Position,
    ) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::MoveWindow {
            window_id: window_id.into(),
            position,
        })
    }

    pub fn resize_window(
        &mut self,
        window_id: impl Into<WindowId>,
        size: Size,
    ) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::ResizeWindow {
            window_id: window_id.into(),
            size,
        })
    }

    pub fn toggle_maximize(&mut self, window_id: impl Into<WindowId>) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::ToggleMaximize {
            window_id: window_id.into(),
        })
    }

    /// Leaves maximized state at geometry computed by a drag gesture. The geometry is clamped.
    pub fn restore_from_maximize(
        &mut self,
        window_id: impl Into<WindowId>,
        position: Position,
        size: Size,
    ) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::RestoreFromMaximize {
            window_id: window_id.into(),
            position,
            size,
        })
    }

    pub fn cascade_windows(&mut self) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::CascadeWindows)
    }

    pub fn tile_windows(&mut self) -> Vec<WindowEffect> {
        self.dispatch(WindowAction::TileWindows)
    }

    /// Clears the persisted layout and resets geometry and stacking to catalog defaults.
    pub fn reset_layout(&mut self, configs: &[WindowConfig]) -> Vec<WindowEffect> {
        if let Err(err) = self.persistence.clear() {
            logging::warn!("reset layout could not clear storage: {err}");
        }
        self.dispatch(WindowAction::ResetLayout {
            configs: configs.to_vec(),
        })
    }

    /// Current layout snapshot without writing it.
    pub fn snapshot(&self) -> LayoutSnapshot {
        self.state.snapshot()
    }

    /// Writes the current snapshot and returns it for change comparison.
    pub fn persist_layout(&self) -> LayoutSnapshot {
        let snapshot = self.state.snapshot();
        if let Err(err) = self.persistence.save(&snapshot) {
            logging::warn!("persist layout failed: {err}");
        }
        snapshot
    }

    /// Writes the current snapshot only when it differs from the gate's last write.
    ///
    /// Returns the written snapshot, or `None` when nothing changed or the write failed.
    pub fn persist_layout_if_changed(
        &self,
        gate: &mut LayoutPersistGate,
    ) -> Option<LayoutSnapshot> {
        let snapshot = self.state.snapshot();
        if !gate.needs_write(&snapshot) {
            return None;
        }
        match self.persistence.save(&snapshot) {
            Ok(()) => {
                gate.mark_written(snapshot.clone());
                Some(snapshot)
            }
            Err(err) => {
                logging::warn!("persist layout failed: {err}");
                None
            }
        }
    }
}
