//! JSON report artifacts.
//!
//! Layout under the output directory:
//!
//! ```text
//! manifest.json          run metadata, summary, one entry per unit
//! summary.json           run metadata and counts only
//! issues/<unit-id>.json  discrepancies for every non-passing unit
//! generated/...          regenerated unit text (written by the pipeline)
//! ```

use crate::error::BatchError;
use crate::pipeline::UnitOutcome;
use mekparity_canonical::UnitId;
use mekparity_verify::{DiscrepancyRecord, IssueCategory, ValidationStatus, ValidationSummary};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A unit outcome with its run-unique id.
#[derive(Debug, Clone)]
pub struct ReportedUnit {
    /// De-duplicated id.
    pub id: UnitId,
    /// Pipeline outcome.
    pub outcome: UnitOutcome,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// Commit checked out in the corpus repository, if any.
    pub repository_commit: Option<String>,
    /// Units in source-path order.
    pub units: Vec<ReportedUnit>,
    /// Reduced counts.
    pub summary: ValidationSummary,
}

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestUnit {
    /// Unit id.
    pub id: UnitId,
    /// Chassis name.
    pub chassis: String,
    /// Model designation.
    pub model: String,
    /// Source path relative to the corpus root.
    pub source_path: String,
    /// Validation status.
    pub status: ValidationStatus,
    /// Category of the first discrepancy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_issue_category: Option<IssueCategory>,
    /// Number of discrepancies.
    pub issue_count: usize,
}

/// `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Run timestamp.
    pub generated_at: String,
    /// Repository commit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_commit: Option<String>,
    /// Run counts.
    pub summary: ValidationSummary,
    /// One entry per unit.
    pub units: Vec<ManifestUnit>,
}

/// `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDocument {
    /// Run timestamp.
    pub generated_at: String,
    /// Repository commit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_commit: Option<String>,
    /// Percentage of units that passed.
    pub pass_rate: f64,
    /// Run counts, inlined.
    #[serde(flatten)]
    pub summary: ValidationSummary,
}

/// `issues/<unit-id>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDocument {
    /// Unit id.
    pub id: UnitId,
    /// Chassis name.
    pub chassis: String,
    /// Model designation.
    pub model: String,
    /// Source path relative to the corpus root.
    pub source_path: String,
    /// Regenerated file path relative to the output directory.
    pub generated_path: Option<String>,
    /// Discrepancies in detection order.
    pub issues: Vec<DiscrepancyRecord>,
}

/// Paths of the written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// `manifest.json`.
    pub manifest: PathBuf,
    /// `summary.json`.
    pub summary: PathBuf,
    /// `issues/`.
    pub issues_dir: PathBuf,
    /// `generated/`.
    pub generated_dir: PathBuf,
    /// Number of issue files written.
    pub issue_files: usize,
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

impl ManifestUnit {
    fn from_reported(unit: &ReportedUnit) -> Self {
        let outcome = &unit.outcome;
        Self {
            id: unit.id.clone(),
            chassis: outcome.chassis.clone(),
            model: outcome.model.clone(),
            source_path: display_path(&outcome.file.relative),
            status: outcome.result.status,
            primary_issue_category: outcome.result.primary_category(),
            issue_count: outcome.result.issue_count(),
        }
    }
}

impl IssueDocument {
    fn from_reported(unit: &ReportedUnit, out_dir: &Path) -> Self {
        let outcome = &unit.outcome;
        Self {
            id: unit.id.clone(),
            chassis: outcome.chassis.clone(),
            model: outcome.model.clone(),
            source_path: display_path(&outcome.file.relative),
            generated_path: outcome
                .generated_path
                .as_deref()
                .map(|path| display_path(path.strip_prefix(out_dir).unwrap_or(path))),
            issues: outcome.result.discrepancies.clone(),
        }
    }
}

/// Writes report artifacts into an output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    out_dir: PathBuf,
}

impl ReportWriter {
    /// Creates a writer rooted at `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Writes `manifest.json`, `summary.json` and one issue file per
    /// non-passing unit. Stale issue files from an earlier run are removed.
    ///
    /// # Errors
    ///
    /// Any I/O or serialization failure is fatal to the run.
    pub fn write(&self, report: &BatchReport) -> Result<ArtifactPaths, BatchError> {
        fs::create_dir_all(&self.out_dir).map_err(BatchError::io(&self.out_dir))?;

        let manifest = Manifest {
            generated_at: report.generated_at.clone(),
            repository_commit: report.repository_commit.clone(),
            summary: report.summary.clone(),
            units: report.units.iter().map(ManifestUnit::from_reported).collect(),
        };
        let manifest_path = self.out_dir.join("manifest.json");
        write_json(&manifest_path, &manifest)?;

        let summary = SummaryDocument {
            generated_at: report.generated_at.clone(),
            repository_commit: report.repository_commit.clone(),
            pass_rate: report.summary.pass_rate(),
            summary: report.summary.clone(),
        };
        let summary_path = self.out_dir.join("summary.json");
        write_json(&summary_path, &summary)?;

        let issues_dir = self.out_dir.join("issues");
        if issues_dir.is_dir() {
            fs::remove_dir_all(&issues_dir).map_err(BatchError::io(&issues_dir))?;
        }
        fs::create_dir_all(&issues_dir).map_err(BatchError::io(&issues_dir))?;

        let mut issue_files = 0;
        for unit in report.units.iter().filter(|u| !u.outcome.result.is_passed()) {
            let document = IssueDocument::from_reported(unit, &self.out_dir);
            write_json(&issues_dir.join(format!("{}.json", unit.id)), &document)?;
            issue_files += 1;
        }

        info!(
            "Wrote report for {} units ({} issue files) to {:?}",
            report.units.len(),
            issue_files,
            self.out_dir
        );

        Ok(ArtifactPaths {
            manifest: manifest_path,
            summary: summary_path,
            issues_dir,
            generated_dir: self.out_dir.join("generated"),
            issue_files,
        })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), BatchError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json).map_err(BatchError::io(path))
}
