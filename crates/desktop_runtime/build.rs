use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    #[serde(default)]
    default_open: bool,
}

#[derive(Debug, Deserialize)]
struct WindowCatalog {
    schema_version: u32,
    windows: Vec<CatalogEntry>,
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("window_catalog.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let catalog: WindowCatalog = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    if catalog.schema_version != 1 {
        panic!(
            "catalog schema mismatch in {}: expected 1 found {}",
            path.display(),
            catalog.schema_version
        );
    }

    let mut seen = BTreeSet::new();
    for entry in &catalog.windows {
        if entry.id.trim().is_empty() {
            panic!("empty window id in {}", path.display());
        }
        if !seen.insert(entry.id.as_str()) {
            panic!("duplicate window id `{}` in {}", entry.id, path.display());
        }
    }

    let rows = catalog
        .windows
        .iter()
        .map(|entry| format!("    ({:?}, {}),\n", entry.id, entry.default_open))
        .collect::<String>();
    let generated = format!(
        "/// Build-time generated window catalog: `(id, default_open)` in placement order.\n\
pub const BUILTIN_WINDOW_CATALOG: &[(&str, bool)] = &[\n{rows}];\n"
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("window_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
