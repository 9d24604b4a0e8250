use std::rc::Rc;

use desktop_runtime::window_manager::{clamp_window_geometry, maximized_bounds};
use desktop_runtime::{
    LayoutPersistence, Position, Size, Viewport, WindowConfig, WindowId, WindowManagerState,
    WindowStore,
};
use platform_host::MemoryPrefsStore;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn alpha_beta() -> Vec<WindowConfig> {
    vec![
        WindowConfig::new("alpha", true),
        WindowConfig::new("beta", false),
    ]
}

fn store(viewport: Viewport) -> (MemoryPrefsStore, WindowStore) {
    let prefs = MemoryPrefsStore::default();
    let store = WindowStore::with_persistence(
        LayoutPersistence::new(Rc::new(prefs.clone())),
        viewport,
    );
    (prefs, store)
}

fn id(name: &str) -> WindowId {
    WindowId::from(name)
}

fn assert_invariants(state: &WindowManagerState) {
    let mut z: Vec<u64> = state.windows_by_id.values().map(|w| w.z_index).collect();
    z.sort();
    let unique = z.len();
    z.dedup();
    assert_eq!(z.len(), unique, "z-indices must be unique");
    assert!(z.last().copied().unwrap_or(0) <= state.z_counter);

    let mut expected_order: Vec<&WindowId> = state.windows_by_id.keys().collect();
    expected_order.sort_by_key(|id| state.windows_by_id[*id].z_index);
    assert_eq!(state.order.iter().collect::<Vec<_>>(), expected_order);

    let expected_active = state
        .windows_by_id
        .values()
        .filter(|w| w.is_open && !w.is_minimized)
        .max_by_key(|w| w.z_index)
        .map(|w| w.id.clone());
    assert_eq!(state.active_id, expected_active);

    for window in state.windows_by_id.values() {
        if window.is_maximized {
            assert_eq!(window.geometry(), maximized_bounds(state.viewport));
            assert!(window.restore.is_some());
        } else {
            assert_eq!(
                clamp_window_geometry(window.geometry(), state.viewport),
                window.geometry(),
                "{} escaped its bounds",
                window.id
            );
            assert!(window.restore.is_none());
        }
    }
}

#[test]
fn init_without_saved_layout_uses_catalog_defaults() {
    let (_, mut store) = store(Viewport::new(1400, 900));
    store.init_windows(&alpha_beta());

    let state = store.state();
    let alpha = state.window(&id("alpha")).expect("alpha");
    let beta = state.window(&id("beta")).expect("beta");
    assert!(alpha.is_open);
    assert!(!beta.is_open);
    assert_eq!(alpha.position, Position::new(120, 80));
    assert_eq!(alpha.size, Size::new(760, 520));
    assert_eq!(state.order, vec![id("alpha"), id("beta")]);
    assert_eq!(state.active_id, Some(id("alpha")));
    assert_invariants(state);
}

#[test]
fn opening_beta_makes_it_active_and_frontmost() {
    let (_, mut store) = store(Viewport::new(1400, 900));
    store.init_windows(&alpha_beta());
    store.open_window("beta");

    let state = store.state();
    assert!(state.window(&id("beta")).expect("beta").is_open);
    assert_eq!(state.active_id, Some(id("beta")));
    assert_eq!(state.order.last(), Some(&id("beta")));
    assert_invariants(state);
}

#[test]
fn maximize_twice_restores_geometry_exactly() {
    let (_, mut store) = store(Viewport::new(1400, 900));
    store.init_windows(&alpha_beta());
    store.move_window("alpha", Position::new(333, 177));
    store.resize_window("alpha", Size::new(641, 389));
    let before = store.state().window(&id("alpha")).expect("alpha").geometry();

    store.toggle_maximize("alpha");
    assert_invariants(store.state());
    store.toggle_maximize("alpha");

    let alpha = store.state().window(&id("alpha")).expect("alpha");
    assert_eq!(alpha.geometry(), before);
    assert!(!alpha.is_maximized);
    assert_invariants(store.state());
}

#[test]
fn tiling_three_windows_uses_two_by_two_grid() {
    let (_, mut store) = store(Viewport::new(900, 600));
    store.init_windows(&[
        WindowConfig::new("alpha", true),
        WindowConfig::new("beta", true),
        WindowConfig::new("gamma", true),
    ]);
    store.tile_windows();

    let state = store.state();
    let geometries: Vec<_> = ["alpha", "beta", "gamma"]
        .iter()
        .map(|name| state.window(&id(name)).expect("window").geometry())
        .collect();
    let mut columns: Vec<i32> = geometries.iter().map(|g| g.position.x).collect();
    let mut rows: Vec<i32> = geometries.iter().map(|g| g.position.y).collect();
    columns.sort();
    columns.dedup();
    rows.sort();
    rows.dedup();
    assert_eq!(columns.len(), 2);
    assert_eq!(rows.len(), 2);

    for (i, a) in geometries.iter().enumerate() {
        for b in geometries.iter().skip(i + 1) {
            assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
        }
    }
    assert_invariants(state);
}

#[test]
fn persisted_layout_round_trips_through_storage() {
    let (prefs, mut store) = store(Viewport::new(1400, 900));
    store.init_windows(&alpha_beta());
    store.open_window("beta");
    store.toggle_maximize("beta");
    store.toggle_minimize("alpha");
    let written = store.persist_layout();

    let reader = LayoutPersistence::new(Rc::new(prefs));
    assert_eq!(reader.load(), Some(written));
}

#[test]
fn restart_restores_maximized_window_with_its_restore_geometry() {
    let (prefs, mut first) = store(Viewport::new(1400, 900));
    first.init_windows(&alpha_beta());
    first.move_window("alpha", Position::new(200, 150));
    first.toggle_maximize("alpha");
    first.persist_layout();

    let mut second = WindowStore::with_persistence(
        LayoutPersistence::new(Rc::new(prefs)),
        Viewport::new(1200, 800),
    );
    second.init_windows(&alpha_beta());
    let alpha = second.state().window(&id("alpha")).expect("alpha");
    assert!(alpha.is_maximized);
    assert_eq!(alpha.geometry(), maximized_bounds(Viewport::new(1200, 800)));
    assert_invariants(second.state());

    second.toggle_maximize("alpha");
    let alpha = second.state().window(&id("alpha")).expect("alpha");
    assert_eq!(alpha.position, Position::new(200, 150));
}

#[test]
fn unknown_ids_leave_state_and_snapshot_untouched() {
    let (_, mut store) = store(Viewport::new(1400, 900));
    store.init_windows(&alpha_beta());
    let before = store.state().clone();
    let before_json = serde_json::to_string(&store.snapshot()).expect("encode");

    assert!(store.open_window("ghost").is_empty());
    store.close_window("ghost");
    store.focus_window("ghost");
    store.toggle_minimize("ghost");
    store.toggle_taskbar_window("ghost");
    store.move_window("ghost", Position::new(5, 5));
    store.resize_window("ghost", Size::new(5, 5));
    store.toggle_maximize("ghost");
    store.restore_from_maximize("ghost", Position::new(5, 5), Size::new(5, 5));

    assert_eq!(store.state(), &before);
    assert_eq!(
        serde_json::to_string(&store.snapshot()).expect("encode"),
        before_json
    );
}

const NAMES: [&str; 5] = ["alpha", "beta", "gamma", "delta", "epsilon"];

#[derive(Debug, Clone)]
enum Command {
    Open(&'static str),
    Close(&'static str),
    Focus(&'static str),
    ToggleMinimize(&'static str),
    ToggleTaskbar(&'static str),
    Move(&'static str, Position),
    Resize(&'static str, Size),
    ToggleMaximize(&'static str),
    RestoreFromMaximize(&'static str, Position, Size),
    Cascade,
    Tile,
    SetViewport(Viewport),
    Reset,
    OpenUnknown,
}

impl Command {
    /// Window this command brings to the front, if it always does.
    fn fronts(&self, state: &WindowManagerState) -> Option<&'static str> {
        match self {
            Self::Open(name)
            | Self::Focus(name)
            | Self::ToggleMaximize(name)
            | Self::RestoreFromMaximize(name, ..) => Some(*name),
            Self::ToggleMinimize(name) => state
                .window(&id(name))
                .filter(|w| w.is_minimized)
                .map(|_| *name),
            _ => None,
        }
    }

    fn apply(self, store: &mut WindowStore, configs: &[WindowConfig]) {
        match self {
            Self::Open(name) => store.open_window(name),
            Self::Close(name) => store.close_window(name),
            Self::Focus(name) => store.focus_window(name),
            Self::ToggleMinimize(name) => store.toggle_minimize(name),
            Self::ToggleTaskbar(name) => store.toggle_taskbar_window(name),
            Self::Move(name, position) => store.move_window(name, position),
            Self::Resize(name, size) => store.resize_window(name, size),
            Self::ToggleMaximize(name) => store.toggle_maximize(name),
            Self::RestoreFromMaximize(name, position, size) => {
                store.restore_from_maximize(name, position, size)
            }
            Self::Cascade => store.cascade_windows(),
            Self::Tile => store.tile_windows(),
            Self::SetViewport(viewport) => store.set_viewport(viewport),
            Self::Reset => store.reset_layout(configs),
            Self::OpenUnknown => store.open_window("ghost"),
        };
    }
}

fn name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(NAMES.to_vec())
}

fn position() -> impl Strategy<Value = Position> {
    (-3_000..3_000i32, -3_000..3_000i32).prop_map(|(x, y)| Position::new(x, y))
}

fn size() -> impl Strategy<Value = Size> {
    (-200..4_000i32, -200..4_000i32).prop_map(|(w, h)| Size::new(w, h))
}

fn viewport() -> impl Strategy<Value = Viewport> {
    (0..2_600i32, 0..1_600i32).prop_map(|(w, h)| Viewport::new(w, h))
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        name().prop_map(Command::Open),
        name().prop_map(Command::Close),
        name().prop_map(Command::Focus),
        name().prop_map(Command::ToggleMinimize),
        name().prop_map(Command::ToggleTaskbar),
        (name(), position()).prop_map(|(n, p)| Command::Move(n, p)),
        (name(), size()).prop_map(|(n, s)| Command::Resize(n, s)),
        name().prop_map(Command::ToggleMaximize),
        (name(), position(), size()).prop_map(|(n, p, s)| Command::RestoreFromMaximize(n, p, s)),
        Just(Command::Cascade),
        Just(Command::Tile),
        viewport().prop_map(Command::SetViewport),
        Just(Command::Reset),
        Just(Command::OpenUnknown),
    ]
}

proptest! {
    #[test]
    fn invariants_hold_across_command_sequences(
        initial_viewport in viewport(),
        commands in prop::collection::vec(command(), 1..80)
    ) {
        let (_, mut store) = store(initial_viewport);
        let configs: Vec<WindowConfig> = NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| WindowConfig::new(*name, i % 2 == 0))
            .collect();
        store.init_windows(&configs);
        assert_invariants(store.state());

        for command in commands {
            let fronted = command.fronts(store.state());
            command.apply(&mut store, &configs);

            let state = store.state();
            if let Some(name) = fronted {
                let window = state.window(&id(name)).expect("catalogued window");
                prop_assert_eq!(window.z_index, state.z_counter);
                prop_assert!(state
                    .windows_by_id
                    .values()
                    .filter(|w| w.id != window.id)
                    .all(|w| w.z_index < window.z_index));
            }
            assert_invariants(state);
        }
    }

    #[test]
    fn snapshot_survives_a_restart_at_the_same_viewport(
        commands in prop::collection::vec(command(), 0..40)
    ) {
        let viewport = Viewport::new(1400, 900);
        let (prefs, mut first) = store(viewport);
        let configs: Vec<WindowConfig> = NAMES
            .iter()
            .map(|name| WindowConfig::new(*name, true))
            .collect();
        first.init_windows(&configs);
        for command in commands {
            if !matches!(command, Command::SetViewport(_)) {
                command.apply(&mut first, &configs);
            }
        }
        let written = first.persist_layout();

        let mut second = WindowStore::with_persistence(
            LayoutPersistence::new(Rc::new(prefs)),
            viewport,
        );
        second.init_windows(&configs);
        assert_invariants(second.state());
        prop_assert_eq!(&second.state().order, &first.state().order);
        prop_assert_eq!(&second.state().active_id, &first.state().active_id);
        for entry in &written {
            let restored = second.state().window(&entry.id).expect("restored window");
            prop_assert_eq!(restored.is_open, entry.is_open);
            prop_assert_eq!(restored.is_minimized, entry.is_minimized);
            prop_assert_eq!(Some(restored.is_maximized), entry.is_maximized);
            let saved_geometry = if restored.is_maximized {
                restored.restore
            } else {
                Some(restored.geometry())
            };
            prop_assert_eq!(saved_geometry.map(|g| g.position), Some(entry.position));
            prop_assert_eq!(saved_geometry.map(|g| g.size), entry.size);
        }
    }
}
