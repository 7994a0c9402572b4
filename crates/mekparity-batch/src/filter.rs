//! Unit-file filtering for selective corpus runs.

use mekparity_formats::Grammar;
use std::path::Path;

/// Trait for selecting which unit files a run processes.
///
/// Paths are relative to the corpus root. Any `Fn(&Path) -> bool` closure
/// is a filter.
pub trait UnitFileFilter: Send + Sync {
    /// Returns true if the file should be processed.
    fn matches(&self, path: &Path) -> bool;
}

impl<F> UnitFileFilter for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn matches(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Accepts every file.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllFiles;

impl UnitFileFilter for AllFiles {
    fn matches(&self, _path: &Path) -> bool {
        true
    }
}

/// Filter by grammar (file extension).
#[derive(Debug, Clone)]
pub struct GrammarFilter {
    /// Grammar to match.
    pub grammar: Grammar,
}

impl UnitFileFilter for GrammarFilter {
    fn matches(&self, path: &Path) -> bool {
        Grammar::from_path(path) == Some(self.grammar)
    }
}

/// Filter by path substring, case-insensitive.
#[derive(Debug, Clone)]
pub struct PathContainsFilter {
    /// Substring to look for in the relative path.
    pub needle: String,
}

impl UnitFileFilter for PathContainsFilter {
    fn matches(&self, path: &Path) -> bool {
        path.to_string_lossy()
            .to_lowercase()
            .contains(&self.needle.to_lowercase())
    }
}

/// Composite filter: all filters must match (AND).
pub struct AndFilter {
    /// Filters to combine with AND logic.
    pub filters: Vec<Box<dyn UnitFileFilter>>,
}

impl UnitFileFilter for AndFilter {
    fn matches(&self, path: &Path) -> bool {
        self.filters.iter().all(|f| f.matches(path))
    }
}

/// Composite filter: any filter must match (OR).
pub struct OrFilter {
    /// Filters to combine with OR logic.
    pub filters: Vec<Box<dyn UnitFileFilter>>,
}

impl UnitFileFilter for OrFilter {
    fn matches(&self, path: &Path) -> bool {
        self.filters.iter().any(|f| f.matches(path))
    }
}
