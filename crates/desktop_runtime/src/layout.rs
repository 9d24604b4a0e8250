//! Cascade and tile arrangement algorithms.
//!
//! Both are pure: they only see the ordered id list (and the available area for tiling) and
//! propose geometry. Callers clamp the result against the live viewport.

use crate::model::{Position, Size, WindowId};

/// Top-left corner of the first cascaded window.
pub const CASCADE_ORIGIN: Position = Position::new(48, 48);
pub const CASCADE_STEP_X: i32 = 28;
pub const CASCADE_STEP_Y: i32 = 26;

/// Spacing between tiles and around the grid.
pub const TILE_GUTTER: i32 = 12;
pub const MIN_TILE_WIDTH: i32 = 320;
pub const MIN_TILE_HEIGHT: i32 = 220;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePlacement {
    pub id: WindowId,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePlacement {
    pub id: WindowId,
    pub position: Position,
    pub size: Size,
}

/// Staggers windows diagonally from [`CASCADE_ORIGIN`] in input order.
pub fn cascade(ids: &[WindowId]) -> Vec<CascadePlacement> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| {
            let step = index as i32;
            CascadePlacement {
                id: id.clone(),
                position: CASCADE_ORIGIN.offset(CASCADE_STEP_X * step, CASCADE_STEP_Y * step),
            }
        })
        .collect()
}

/// Near-square grid for `count` windows: `(columns, rows)`.
pub fn grid_dimensions(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let mut columns = 1;
    while columns * columns < count {
        columns += 1;
    }
    (columns, count.div_ceil(columns))
}

/// Partitions a `width × height` area into equal cells, assigned row-major in input order.
///
/// Cells are floored at [`MIN_TILE_WIDTH`] × [`MIN_TILE_HEIGHT`], so very large counts on small
/// areas overflow; the caller's clamp pass pulls those back inside the viewport.
pub fn tile(ids: &[WindowId], width: i32, height: i32) -> Vec<TilePlacement> {
    let (columns, rows) = grid_dimensions(ids.len());
    if columns == 0 {
        return Vec::new();
    }

    let cols = columns as i32;
    let rows = rows as i32;
    let cell_width = ((width - TILE_GUTTER * (cols + 1)) / cols).max(MIN_TILE_WIDTH);
    let cell_height = ((height - TILE_GUTTER * (rows + 1)) / rows).max(MIN_TILE_HEIGHT);

    ids.iter()
        .enumerate()
        .map(|(index, id)| {
            let col = (index % columns) as i32;
            let row = (index / columns) as i32;
            TilePlacement {
                id: id.clone(),
                position: Position::new(
                    TILE_GUTTER + col * (cell_width + TILE_GUTTER),
                    TILE_GUTTER + row * (cell_height + TILE_GUTTER),
                ),
                size: Size::new(cell_width, cell_height),
            }
        })
        .collect()
}
