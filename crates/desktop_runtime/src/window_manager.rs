//! Window geometry helpers: viewport clamping, maximized bounds, and default placement.

use crate::model::{Position, Size, Viewport, WindowGeometry};

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 320;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 220;
/// Gap kept between a window frame and every viewport edge.
pub const WINDOW_EDGE_MARGIN: i32 = 8;

pub const DEFAULT_WINDOW_POSITION: Position = Position::new(120, 80);
pub const DEFAULT_WINDOW_SIZE: Size = Size::new(760, 520);
/// Per-slot offset of default placements; slots wrap after [`DEFAULT_PLACEMENT_SLOTS`].
pub const DEFAULT_PLACEMENT_STEP: Position = Position::new(28, 26);
pub const DEFAULT_PLACEMENT_SLOTS: usize = 8;

/// Fits a requested rectangle into `viewport`.
///
/// Size is clamped first (shrunk to fit, floored at the minimum window size), then position is
/// clamped so the frame stays [`WINDOW_EDGE_MARGIN`] away from every edge. On viewports too small
/// for `2 × margin + minimum`, the margin gives way before the minimum size does; the minimum only
/// relaxes once the viewport is smaller than the minimum itself.
pub fn clamp_window_geometry(geometry: WindowGeometry, viewport: Viewport) -> WindowGeometry {
    let (width, x) = clamp_axis(
        geometry.size.width,
        geometry.position.x,
        viewport.width(),
        MIN_WINDOW_WIDTH,
    );
    let (height, y) = clamp_axis(
        geometry.size.height,
        geometry.position.y,
        viewport.height(),
        MIN_WINDOW_HEIGHT,
    );
    WindowGeometry::new(Position::new(x, y), Size::new(width, height))
}

fn clamp_axis(size: i32, position: i32, view: i32, min_size: i32) -> (i32, i32) {
    let view = view.max(0);
    let margin = if view >= 2 * WINDOW_EDGE_MARGIN + min_size {
        WINDOW_EDGE_MARGIN
    } else {
        ((view - min_size) / 2).max(0)
    };
    let max_size = view - 2 * margin;
    let min_size = min_size.min(max_size);
    let size = size.clamp(min_size, max_size);
    let position = position.clamp(margin, view - margin - size);
    (size, position)
}

/// Returns `true` when `geometry` is already a fixed point of [`clamp_window_geometry`].
pub fn is_within_bounds(geometry: WindowGeometry, viewport: Viewport) -> bool {
    clamp_window_geometry(geometry, viewport) == geometry
}

/// Full-viewport bounds for a maximized window, floored at the minimum window size.
pub fn maximized_bounds(viewport: Viewport) -> WindowGeometry {
    WindowGeometry::new(
        Position::new(0, 0),
        Size::new(viewport.width(), viewport.height())
            .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT),
    )
}

/// Unclamped default placement for the catalog entry at `index`.
pub fn default_geometry(index: usize) -> WindowGeometry {
    let slot = (index % DEFAULT_PLACEMENT_SLOTS) as i32;
    WindowGeometry::new(
        DEFAULT_WINDOW_POSITION.offset(
            DEFAULT_PLACEMENT_STEP.x * slot,
            DEFAULT_PLACEMENT_STEP.y * slot,
        ),
        DEFAULT_WINDOW_SIZE,
    )
}

/// Geometry used when un-maximizing a window that lost its restore snapshot.
pub fn fallback_restore_geometry() -> WindowGeometry {
    WindowGeometry::new(DEFAULT_WINDOW_POSITION, DEFAULT_WINDOW_SIZE)
}
