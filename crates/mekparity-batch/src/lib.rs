//! Corpus-wide round-trip validation.
//!
//! A run walks a corpus directory, pushes every unit file through
//! read → parse → render → compare, mirrors the regenerated text under
//! `generated/`, and writes JSON report artifacts.
//!
//! # Example
//!
//! ```rust,no_run
//! use mekparity_batch::{BatchOptions, BatchRunner, PathContainsFilter};
//! use std::path::Path;
//!
//! let options = BatchOptions {
//!     jobs: 4,
//!     filter: Box::new(PathContainsFilter { needle: "assault".into() }),
//!     ..BatchOptions::default()
//! };
//! let (report, paths) = BatchRunner::new(options).run(Path::new("data/mechs"), Path::new("out"))?;
//! println!("{} units, manifest at {:?}", report.summary.units_validated, paths.manifest);
//! # Ok::<(), mekparity_batch::BatchError>(())
//! ```
//!
//! Core invariants:
//! - Unit parse failures never abort a run
//! - Results are reported in source-path order regardless of `jobs`
//! - Unit ids are unique within a run
//!
#![deny(missing_docs)]

/// Corpus discovery.
pub mod corpus;
/// Error types.
pub mod error;
pub mod filter;
/// Run orchestration.
pub mod orchestrator;
/// Per-unit pipeline.
pub mod pipeline;
pub mod repo;
pub mod report;

pub use corpus::{discover_units, UnitFile};
pub use error::BatchError;
pub use filter::{AllFiles, AndFilter, GrammarFilter, OrFilter, PathContainsFilter, UnitFileFilter};
pub use orchestrator::{BatchOptions, BatchRunner};
pub use pipeline::{process_unit, UnitOutcome};
pub use repo::repository_commit;
pub use report::{
    ArtifactPaths, BatchReport, IssueDocument, Manifest, ManifestUnit, ReportWriter, ReportedUnit,
    SummaryDocument,
};
