//! Corpus discovery.

use crate::error::BatchError;
use crate::filter::UnitFileFilter;
use mekparity_formats::Grammar;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One unit file found under the corpus root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFile {
    /// Absolute (or root-joined) path.
    pub path: PathBuf,
    /// Path relative to the corpus root.
    pub relative: PathBuf,
    /// Grammar chosen by extension.
    pub grammar: Grammar,
}

/// Recursively collects unit files under `root`, sorted by relative path.
///
/// Hidden directories (such as `.git`) are skipped.
///
/// # Errors
///
/// Returns [`BatchError::NotADirectory`] if `root` is not a directory and
/// [`BatchError::Io`] if a directory cannot be listed.
pub fn discover_units(
    root: &Path,
    filter: &dyn UnitFileFilter,
) -> Result<Vec<UnitFile>, BatchError> {
    if !root.is_dir() {
        return Err(BatchError::NotADirectory(root.to_path_buf()));
    }
    let mut found = Vec::new();
    walk(root, root, filter, &mut found)?;
    found.sort_by(|a, b| a.relative.cmp(&b.relative));
    info!("Found {} unit files under {:?}", found.len(), root);
    Ok(found)
}

fn walk(
    root: &Path,
    dir: &Path,
    filter: &dyn UnitFileFilter,
    found: &mut Vec<UnitFile>,
) -> Result<(), BatchError> {
    let entries = std::fs::read_dir(dir).map_err(BatchError::io(dir))?;

    for entry in entries {
        let entry = entry.map_err(BatchError::io(dir))?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');

        if path.is_dir() {
            if !hidden {
                walk(root, &path, filter, found)?;
            }
            continue;
        }
        let Some(grammar) = Grammar::from_path(&path) else {
            continue;
        };
        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        if filter.matches(&relative) {
            found.push(UnitFile {
                path,
                relative,
                grammar,
            });
        } else {
            debug!("Filtered out {:?}", relative);
        }
    }

    Ok(())
}
