use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_VIEWPORT_WIDTH: i32 = 1280;
pub const DEFAULT_VIEWPORT_HEIGHT: i32 = 800;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WindowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&WindowId> for WindowId {
    fn from(id: &WindowId) -> Self {
        id.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn clamped_min(self, min_width: i32, min_height: i32) -> Self {
        Self {
            width: self.width.max(min_width),
            height: self.height.max(min_height),
        }
    }
}

/// Usable desktop area (screen minus fixed chrome such as the taskbar).
///
/// Replaced wholesale whenever the host reports a resize. Dimensions are never negative;
/// deserialized values are floored the same way as [`Viewport::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawViewport")]
pub struct Viewport {
    width: i32,
    height: i32,
}

impl Viewport {
    /// Builds a viewport, flooring negative dimensions at zero.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
        }
    }

    pub fn width(self) -> i32 {
        self.width
    }

    pub fn height(self) -> i32 {
        self.height
    }
}

#[derive(Deserialize)]
struct RawViewport {
    width: i32,
    height: i32,
}

impl From<RawViewport> for Viewport {
    fn from(raw: RawViewport) -> Self {
        Self::new(raw.width, raw.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }
}

/// A window's on-screen rectangle; also the shape of a pre-maximize restore snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub position: Position,
    pub size: Size,
}

impl WindowGeometry {
    pub const fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    pub fn right(self) -> i32 {
        self.position.x + self.size.width
    }

    pub fn bottom(self) -> i32 {
        self.position.y + self.size.height
    }

    /// Returns `true` when the two rectangles share interior area (touching edges do not count).
    pub fn intersects(self, other: Self) -> bool {
        self.position.x < other.right()
            && other.position.x < self.right()
            && self.position.y < other.bottom()
            && other.position.y < self.bottom()
    }
}

/// Catalog entry supplied by the host; immutable for the lifetime of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub id: WindowId,
    #[serde(default)]
    pub default_open: bool,
}

impl WindowConfig {
    pub fn new(id: impl Into<WindowId>, default_open: bool) -> Self {
        Self {
            id: id.into(),
            default_open,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    pub id: WindowId,
    pub is_open: bool,
    pub is_minimized: bool,
    pub is_maximized: bool,
    pub z_index: u64,
    pub position: Position,
    pub size: Size,
    /// Pre-maximize geometry; present only while maximized.
    pub restore: Option<WindowGeometry>,
}

impl WindowState {
    pub fn geometry(&self) -> WindowGeometry {
        WindowGeometry::new(self.position, self.size)
    }

    pub fn set_geometry(&mut self, geometry: WindowGeometry) {
        self.position = geometry.position;
        self.size = geometry.size;
    }

    /// Open and not minimized: eligible to be the active window.
    pub fn is_visible(&self) -> bool {
        self.is_open && !self.is_minimized
    }

    /// Persisted record for this window. Maximized windows record their restore geometry, since
    /// the maximized bounds are recomputed from the viewport on load.
    pub fn layout_entry(&self) -> LayoutEntry {
        let geometry = match (self.is_maximized, self.restore) {
            (true, Some(restore)) => restore,
            _ => self.geometry(),
        };
        LayoutEntry {
            id: self.id.clone(),
            position: geometry.position,
            size: Some(geometry.size),
            z_index: self.z_index,
            is_open: self.is_open,
            is_minimized: self.is_minimized,
            is_maximized: Some(self.is_maximized),
        }
    }
}

/// Authoritative window-manager state owned by [`crate::store::WindowStore`].
///
/// `order` and `active_id` are derived fields, recomputed eagerly after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowManagerState {
    pub windows_by_id: BTreeMap<WindowId, WindowState>,
    /// Window ids ascending by z-index (back to front).
    pub order: Vec<WindowId>,
    /// Open, non-minimized window with the highest z-index.
    pub active_id: Option<WindowId>,
    pub viewport: Viewport,
    /// Last issued z-index.
    pub z_counter: u64,
    pub initialized: bool,
}

impl WindowManagerState {
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn window(&self, id: &WindowId) -> Option<&WindowState> {
        self.windows_by_id.get(id)
    }

    /// Windows back to front.
    pub fn ordered_windows(&self) -> impl Iterator<Item = &WindowState> + '_ {
        self.order.iter().filter_map(|id| self.windows_by_id.get(id))
    }

    pub fn open_windows(&self) -> Vec<&WindowState> {
        self.ordered_windows().filter(|w| w.is_open).collect()
    }

    pub fn visible_windows(&self) -> Vec<&WindowState> {
        self.ordered_windows().filter(|w| w.is_visible()).collect()
    }

    pub fn active_window(&self) -> Option<&WindowState> {
        self.active_id.as_ref().and_then(|id| self.window(id))
    }

    /// Issues the next z-index from the shared counter.
    pub(crate) fn next_z_index(&mut self) -> u64 {
        self.z_counter = self.z_counter.saturating_add(1);
        self.z_counter
    }

    /// Recomputes `order` and `active_id` from the window records.
    pub(crate) fn recompute_derived(&mut self) {
        let mut ranked: Vec<(u64, &WindowId)> = self
            .windows_by_id
            .values()
            .map(|w| (w.z_index, &w.id))
            .collect();
        ranked.sort();
        self.order = ranked.into_iter().map(|(_, id)| id.clone()).collect();

        self.active_id = self
            .windows_by_id
            .values()
            .filter(|w| w.is_visible())
            .max_by_key(|w| w.z_index)
            .map(|w| w.id.clone());
    }

    /// Current layout snapshot, back to front.
    pub fn snapshot(&self) -> LayoutSnapshot {
        self.ordered_windows().map(WindowState::layout_entry).collect()
    }
}

/// One persisted window record.
///
/// `size` and `is_maximized` are optional on the wire; absent keys are omitted when written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    pub id: WindowId,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    pub z_index: u64,
    pub is_open: bool,
    pub is_minimized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_maximized: Option<bool>,
}

/// Persisted layout: a JSON list of [`LayoutEntry`] values.
pub type LayoutSnapshot = Vec<LayoutEntry>;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn window(id: &str, z_index: u64, is_open: bool, is_minimized: bool) -> WindowState {
        WindowState {
            id: WindowId::from(id),
            is_open,
            is_minimized,
            is_maximized: false,
            z_index,
            position: Position::new(10, 10),
            size: Size::new(400, 300),
            restore: None,
        }
    }

    fn state_of(windows: Vec<WindowState>) -> WindowManagerState {
        let mut state = WindowManagerState::default();
        for w in windows {
            state.windows_by_id.insert(w.id.clone(), w);
        }
        state.recompute_derived();
        state
    }

    #[test]
    fn derived_order_follows_z_index_not_id() {
        let state = state_of(vec![
            window("alpha", 3, true, false),
            window("beta", 1, true, false),
            window("gamma", 2, false, false),
        ]);
        let order: Vec<&str> = state.order.iter().map(WindowId::as_str).collect();
        assert_eq!(order, vec!["beta", "gamma", "alpha"]);
    }

    #[test]
    fn active_id_skips_closed_and_minimized_windows() {
        let state = state_of(vec![
            window("alpha", 1, true, false),
            window("beta", 2, true, true),
            window("gamma", 3, false, false),
        ]);
        assert_eq!(state.active_id, Some(WindowId::from("alpha")));

        let state = state_of(vec![window("alpha", 1, false, false)]);
        assert_eq!(state.active_id, None);
    }

    #[test]
    fn layout_entry_serializes_camel_case_keys() {
        let entry = window("alpha", 4, true, false).layout_entry();
        let json = serde_json::to_value(&entry).expect("serialize entry");
        assert_eq!(
            json,
            serde_json::json!({
                "id": "alpha",
                "position": { "x": 10, "y": 10 },
                "size": { "width": 400, "height": 300 },
                "zIndex": 4,
                "isOpen": true,
                "isMinimized": false,
                "isMaximized": false
            })
        );
    }

    #[test]
    fn maximized_layout_entry_records_restore_geometry() {
        let restore = WindowGeometry::new(Position::new(200, 150), Size::new(640, 400));
        let maximized = WindowState {
            is_maximized: true,
            position: Position::new(0, 0),
            size: Size::new(1400, 900),
            restore: Some(restore),
            ..window("alpha", 2, true, false)
        };
        let entry = maximized.layout_entry();
        assert_eq!(entry.position, restore.position);
        assert_eq!(entry.size, Some(restore.size));
        assert_eq!(entry.is_maximized, Some(true));
    }

    #[test]
    fn layout_entry_omits_absent_optional_keys() {
        let entry = LayoutEntry {
            size: None,
            is_maximized: None,
            ..window("alpha", 1, false, false).layout_entry()
        };
        let json = serde_json::to_value(&entry).expect("serialize entry");
        let object = json.as_object().expect("object");
        assert!(!object.contains_key("size"));
        assert!(!object.contains_key("isMaximized"));
    }

    #[test]
    fn geometry_intersection_ignores_shared_edges() {
        let left = WindowGeometry::new(Position::new(0, 0), Size::new(100, 100));
        let touching = WindowGeometry::new(Position::new(100, 0), Size::new(100, 100));
        let overlapping = WindowGeometry::new(Position::new(99, 99), Size::new(10, 10));
        assert!(!left.intersects(touching));
        assert!(left.intersects(overlapping));
    }

    #[test]
    fn viewport_floors_negative_dimensions() {
        let viewport = Viewport::new(-5, 20);
        assert_eq!((viewport.width(), viewport.height()), (0, 20));
    }

    #[test]
    fn deserialized_viewport_is_floored() {
        let viewport: Viewport =
            serde_json::from_str(r#"{"width":-300,"height":-1}"#).expect("decode viewport");
        assert_eq!(viewport, Viewport::new(0, 0));
        assert_eq!(
            serde_json::to_string(&Viewport::new(640, 480)).expect("encode viewport"),
            r#"{"width":640,"height":480}"#
        );
    }
}
