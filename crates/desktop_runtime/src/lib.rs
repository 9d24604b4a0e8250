//! Window-state runtime for the retro desktop shell.
//!
//! [`WindowStore`] owns the open/minimized/maximized flags, geometry, and stacking order of a
//! fixed catalog of windows inside a bounded viewport. Geometry is fitted by
//! [`window_manager::clamp_window_geometry`], cascade/tile commands come from [`layout`], and
//! [`persistence`] loads and saves the layout snapshot. Scheduling of layout writes is left to the
//! host.

pub mod catalog;
pub mod config;
pub mod layout;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod store;
pub mod window_manager;

pub use catalog::{CatalogError, CatalogGuard};
pub use config::{builtin_window_catalog, ConfigError, DesktopConfig};
pub use model::*;
pub use persistence::{
    should_persist_layout, LayoutPersistGate, LayoutPersistence, LayoutPersistenceError,
    LAYOUT_STORAGE_KEY,
};
pub use reducer::{reduce_windows, WindowAction, WindowEffect};
pub use store::{Subscription, WindowStore};
