//! JSON import/export of dua collections.
//! Saves and loads `DuaCollection` structures to/from JSON files.

use crate::error::ContentError;
use crate::models::DuaCollection;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Exports a collection to a JSON file at the specified path.
/// Returns an error if file creation or writing fails.
pub fn export_json_to_path(collection: &DuaCollection, path: &Path) -> Result<(), ContentError> {
    let json_string = serde_json::to_string_pretty(collection)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    info!(
        "Collection '{}' exported to '{}'",
        collection.name,
        path.display()
    );
    Ok(())
}

/// Imports a collection from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_json(path: &Path) -> Result<DuaCollection, ContentError> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let collection: DuaCollection = serde_json::from_str(&contents)?;

    info!(
        "Collection '{}' imported from '{}' ({} duas)",
        collection.name,
        path.display(),
        collection.len()
    );
    Ok(collection)
}
