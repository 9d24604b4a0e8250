//! Reducer actions, side-effect intents, and transition logic for the window manager.
//!
//! Every transition is total: actions naming an unknown window leave the state untouched and emit
//! no effects. Geometry-changing paths always funnel through
//! [`clamp_window_geometry`] or [`maximized_bounds`].

use std::collections::BTreeSet;

use crate::layout::{cascade, tile};
use crate::model::{
    LayoutSnapshot, Position, Size, Viewport, WindowConfig, WindowGeometry, WindowId,
    WindowManagerState, WindowState,
};
use crate::persistence::should_persist_layout;
use crate::window_manager::{
    clamp_window_geometry, default_geometry, fallback_restore_geometry, maximized_bounds,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_windows`] to mutate [`WindowManagerState`].
pub enum WindowAction {
    /// Build window records from the catalog, overlaying a saved layout when present.
    InitWindows {
        /// Catalog entries in placement order.
        configs: Vec<WindowConfig>,
        /// Previously persisted layout, if any.
        saved_layout: Option<LayoutSnapshot>,
    },
    /// Replace the viewport and refit every window to it.
    SetViewport {
        /// New usable desktop area.
        viewport: Viewport,
    },
    /// Open (or un-minimize) a window and bring it to front.
    OpenWindow {
        /// Window to open.
        window_id: WindowId,
    },
    /// Close a window.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Un-minimize a window and bring it to front.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window, or restore it to front when already minimized.
    ToggleMinimize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Taskbar button behavior: restore if minimized, minimize if active, otherwise focus.
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Move a non-maximized window.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// Requested top-left corner.
        position: Position,
    },
    /// Resize a non-maximized window.
    ResizeWindow {
        /// Window to resize.
        window_id: WindowId,
        /// Requested size.
        size: Size,
    },
    /// Maximize a window, or restore it when already maximized.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Leave maximized state at caller-computed geometry (drag-to-restore).
    RestoreFromMaximize {
        /// Window to restore.
        window_id: WindowId,
        /// Target top-left corner.
        position: Position,
        /// Target size.
        size: Size,
    },
    /// Stagger every open window diagonally.
    CascadeWindows,
    /// Arrange every open window in a near-square grid.
    TileWindows,
    /// Reset geometry and stacking to catalog defaults, keeping open/minimized/maximized flags.
    ResetLayout {
        /// Catalog entries in placement order.
        configs: Vec<WindowConfig>,
    },
}

impl WindowAction {
    /// Window targeted by this action, for actions that target exactly one.
    pub fn window_id(&self) -> Option<&WindowId> {
        match self {
            Self::OpenWindow { window_id }
            | Self::CloseWindow { window_id }
            | Self::FocusWindow { window_id }
            | Self::ToggleMinimize { window_id }
            | Self::ToggleTaskbarWindow { window_id }
            | Self::MoveWindow { window_id, .. }
            | Self::ResizeWindow { window_id, .. }
            | Self::ToggleMaximize { window_id }
            | Self::RestoreFromMaximize { window_id, .. } => Some(window_id),
            Self::InitWindows { .. }
            | Self::SetViewport { .. }
            | Self::CascadeWindows
            | Self::TileWindows
            | Self::ResetLayout { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_windows`] for the host to execute.
pub enum WindowEffect {
    /// The persisted layout is stale; the host should schedule a write.
    PersistLayout,
    /// A window became active; the host should move input focus into it.
    FocusWindowInput(WindowId),
}

/// Applies a [`WindowAction`] and collects resulting side effects.
///
/// Derived fields (`order`, `active_id`) are recomputed before returning.
pub fn reduce_windows(state: &mut WindowManagerState, action: WindowAction) -> Vec<WindowEffect> {
    let layout_before = state.snapshot();
    let active_before = state.active_id.clone();

    match action {
        WindowAction::InitWindows {
            configs,
            saved_layout,
        } => init_windows(state, &configs, saved_layout),
        WindowAction::SetViewport { viewport } => set_viewport(state, viewport),
        WindowAction::OpenWindow { window_id } => {
            if let Some(window) = state.windows_by_id.get_mut(&window_id) {
                window.is_open = true;
                window.is_minimized = false;
                bring_to_front(state, &window_id);
            }
        }
        WindowAction::CloseWindow { window_id } => {
            if let Some(window) = state.windows_by_id.get_mut(&window_id) {
                window.is_open = false;
                window.is_minimized = false;
            }
        }
        WindowAction::FocusWindow { window_id } => focus_window(state, &window_id),
        WindowAction::ToggleMinimize { window_id } => {
            let Some(window) = state.windows_by_id.get_mut(&window_id) else {
                return Vec::new();
            };
            if window.is_minimized {
                focus_window(state, &window_id);
            } else {
                window.is_minimized = true;
            }
        }
        WindowAction::ToggleTaskbarWindow { window_id } => {
            let Some(window) = state.windows_by_id.get_mut(&window_id) else {
                return Vec::new();
            };
            if !window.is_open {
                window.is_open = true;
                focus_window(state, &window_id);
            } else if window.is_minimized {
                focus_window(state, &window_id);
            } else if state.active_id.as_ref() == Some(&window_id) {
                window.is_minimized = true;
            } else {
                focus_window(state, &window_id);
            }
        }
        WindowAction::MoveWindow {
            window_id,
            position,
        } => {
            let viewport = state.viewport;
            if let Some(window) = state.windows_by_id.get_mut(&window_id) {
                if !window.is_maximized {
                    let requested = WindowGeometry::new(position, window.size);
                    window.set_geometry(clamp_window_geometry(requested, viewport));
                }
            }
        }
        WindowAction::ResizeWindow { window_id, size } => {
            let viewport = state.viewport;
            if let Some(window) = state.windows_by_id.get_mut(&window_id) {
                if !window.is_maximized {
                    let requested = WindowGeometry::new(window.position, size);
                    window.set_geometry(clamp_window_geometry(requested, viewport));
                }
            }
        }
        WindowAction::ToggleMaximize { window_id } => toggle_maximize(state, &window_id),
        WindowAction::RestoreFromMaximize {
            window_id,
            position,
            size,
        } => {
            let viewport = state.viewport;
            if let Some(window) = state.windows_by_id.get_mut(&window_id) {
                let target = WindowGeometry::new(position, size);
                window.set_geometry(clamp_window_geometry(target, viewport));
                window.is_maximized = false;
                window.restore = None;
                bring_to_front(state, &window_id);
            }
        }
        WindowAction::CascadeWindows => {
            let ids = open_window_ids(state);
            let viewport = state.viewport;
            for placement in cascade(&ids) {
                if let Some(window) = state.windows_by_id.get_mut(&placement.id) {
                    let size = unmaximized_size(window);
                    let requested = WindowGeometry::new(placement.position, size);
                    window.set_geometry(clamp_window_geometry(requested, viewport));
                    window.is_maximized = false;
                    window.restore = None;
                }
            }
        }
        WindowAction::TileWindows => {
            let ids = open_window_ids(state);
            let viewport = state.viewport;
            for placement in tile(&ids, viewport.width(), viewport.height()) {
                if let Some(window) = state.windows_by_id.get_mut(&placement.id) {
                    let requested = WindowGeometry::new(placement.position, placement.size);
                    window.set_geometry(clamp_window_geometry(requested, viewport));
                    window.is_maximized = false;
                    window.restore = None;
                }
            }
        }
        WindowAction::ResetLayout { configs } => reset_layout(state, &configs),
    }

    state.recompute_derived();

    let mut effects = Vec::new();
    if should_persist_layout(&layout_before, &state.snapshot()) {
        effects.push(WindowEffect::PersistLayout);
    }
    if state.active_id != active_before {
        if let Some(active) = &state.active_id {
            effects.push(WindowEffect::FocusWindowInput(active.clone()));
        }
    }
    effects
}

fn init_windows(
    state: &mut WindowManagerState,
    configs: &[WindowConfig],
    saved_layout: Option<LayoutSnapshot>,
) {
    if state.initialized {
        return;
    }
    let viewport = state.viewport;

    for (index, config) in configs.iter().enumerate() {
        if state.windows_by_id.contains_key(&config.id) {
            continue;
        }
        let z_index = state.next_z_index();
        let geometry = clamp_window_geometry(default_geometry(index), viewport);
        state.windows_by_id.insert(
            config.id.clone(),
            WindowState {
                id: config.id.clone(),
                is_open: config.default_open,
                is_minimized: false,
                is_maximized: false,
                z_index,
                position: geometry.position,
                size: geometry.size,
                restore: None,
            },
        );
    }

    for entry in saved_layout.unwrap_or_default() {
        let Some(window) = state.windows_by_id.get_mut(&entry.id) else {
            continue;
        };
        let saved = WindowGeometry::new(entry.position, entry.size.unwrap_or(window.size));
        window.z_index = entry.z_index;
        window.is_open = entry.is_open;
        window.is_minimized = entry.is_minimized;
        window.is_maximized = entry.is_maximized.unwrap_or(false);
        if window.is_maximized {
            window.restore = Some(clamp_window_geometry(saved, viewport));
            window.set_geometry(maximized_bounds(viewport));
        } else {
            window.restore = None;
            window.set_geometry(clamp_window_geometry(saved, viewport));
        }
    }

    compact_z_indices(state);
    state.initialized = true;
}

/// Restacks every window to `1..=n`, keeping relative order (ties broken by id), and resets
/// `z_counter` to `n`.
///
/// Saved layouts may carry colliding or arbitrarily large z-indices.
fn compact_z_indices(state: &mut WindowManagerState) {
    let mut ranked: Vec<(u64, WindowId)> = state
        .windows_by_id
        .values()
        .map(|w| (w.z_index, w.id.clone()))
        .collect();
    ranked.sort();
    let mut next_z = 0;
    for (_, id) in ranked {
        if let Some(window) = state.windows_by_id.get_mut(&id) {
            next_z += 1;
            window.z_index = next_z;
        }
    }
    state.z_counter = next_z;
}

fn set_viewport(state: &mut WindowManagerState, viewport: Viewport) {
    state.viewport = viewport;
    for window in state.windows_by_id.values_mut() {
        if window.is_maximized {
            let restore = window.restore.unwrap_or_else(fallback_restore_geometry);
            window.restore = Some(clamp_window_geometry(restore, viewport));
            window.set_geometry(maximized_bounds(viewport));
        } else {
            window.set_geometry(clamp_window_geometry(window.geometry(), viewport));
        }
    }
}

fn focus_window(state: &mut WindowManagerState, window_id: &WindowId) {
    if let Some(window) = state.windows_by_id.get_mut(window_id) {
        window.is_minimized = false;
        bring_to_front(state, window_id);
    }
}

fn toggle_maximize(state: &mut WindowManagerState, window_id: &WindowId) {
    let viewport = state.viewport;
    let Some(window) = state.windows_by_id.get_mut(window_id) else {
        return;
    };

    if window.is_maximized {
        let target = window.restore.take().unwrap_or_else(fallback_restore_geometry);
        window.set_geometry(clamp_window_geometry(target, viewport));
        window.is_maximized = false;
    } else {
        window.restore = Some(window.geometry());
        window.set_geometry(maximized_bounds(viewport));
        window.is_open = true;
        window.is_minimized = false;
        window.is_maximized = true;
    }
    bring_to_front(state, window_id);
}

fn reset_layout(state: &mut WindowManagerState, configs: &[WindowConfig]) {
    let viewport = state.viewport;
    let mut reset_ids = BTreeSet::new();
    let mut next_z = 0;

    for (index, config) in configs.iter().enumerate() {
        if !reset_ids.insert(config.id.clone()) {
            continue;
        }
        let Some(window) = state.windows_by_id.get_mut(&config.id) else {
            continue;
        };
        next_z += 1;
        window.z_index = next_z;
        let geometry = clamp_window_geometry(default_geometry(index), viewport);
        if window.is_maximized {
            window.restore = Some(geometry);
            window.set_geometry(maximized_bounds(viewport));
        } else {
            window.restore = None;
            window.set_geometry(geometry);
        }
    }

    // Windows outside the supplied catalog keep their geometry and stack above the reset ones.
    let leftovers: Vec<WindowId> = state
        .order
        .iter()
        .filter(|id| !reset_ids.contains(*id))
        .cloned()
        .collect();
    for id in leftovers {
        if let Some(window) = state.windows_by_id.get_mut(&id) {
            next_z += 1;
            window.z_index = next_z;
        }
    }

    state.z_counter = next_z;
}

fn bring_to_front(state: &mut WindowManagerState, window_id: &WindowId) {
    if state.z_counter == u64::MAX {
        compact_z_indices(state);
    }
    let z_index = state.next_z_index();
    if let Some(window) = state.windows_by_id.get_mut(window_id) {
        window.z_index = z_index;
    }
}

fn open_window_ids(state: &WindowManagerState) -> Vec<WindowId> {
    state
        .ordered_windows()
        .filter(|w| w.is_open)
        .map(|w| w.id.clone())
        .collect()
}

/// Size a window returns to when a layout command un-maximizes it.
fn unmaximized_size(window: &WindowState) -> Size {
    match (window.is_maximized, window.restore) {
        (true, Some(restore)) => restore.size,
        _ => window.size,
    }
}
