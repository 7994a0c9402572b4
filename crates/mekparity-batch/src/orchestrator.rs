//! Batch orchestration over a corpus directory.

use crate::corpus::{discover_units, UnitFile};
use crate::error::BatchError;
use crate::filter::{AllFiles, UnitFileFilter};
use crate::pipeline::{process_unit, UnitOutcome};
use crate::repo::repository_commit;
use crate::report::{ArtifactPaths, BatchReport, ReportWriter, ReportedUnit};
use mekparity_verify::ValidationSummary;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::info;

/// Options for a batch run.
pub struct BatchOptions {
    /// Worker threads; 1 runs sequentially.
    pub jobs: usize,
    /// Print one progress line per file.
    pub verbose: bool,
    /// In quiet mode, print a percentage every N files (and on the last).
    pub progress_every: usize,
    /// Which files to process.
    pub filter: Box<dyn UnitFileFilter>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            verbose: false,
            progress_every: 50,
            filter: Box::new(AllFiles),
        }
    }
}

impl fmt::Debug for BatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchOptions")
            .field("jobs", &self.jobs)
            .field("verbose", &self.verbose)
            .field("progress_every", &self.progress_every)
            .finish_non_exhaustive()
    }
}

/// Runs the per-unit pipeline over a corpus and writes the report.
pub struct BatchRunner {
    options: BatchOptions,
    progress: Mutex<Box<dyn Write + Send>>,
}

impl BatchRunner {
    /// Creates a runner that reports progress on stderr.
    pub fn new(options: BatchOptions) -> Self {
        Self {
            options,
            progress: Mutex::new(Box::new(io::stderr())),
        }
    }

    /// Replaces the progress sink.
    pub fn with_progress_sink(mut self, sink: impl Write + Send + 'static) -> Self {
        self.progress = Mutex::new(Box::new(sink));
        self
    }

    /// Validates every selected unit under `corpus` and writes artifacts
    /// into `out_dir`.
    ///
    /// Files already under `out_dir` are never treated as sources, so the
    /// output directory may live inside the corpus.
    ///
    /// # Errors
    ///
    /// Fails on an unreadable corpus, a failed write of regenerated text or
    /// report artifacts, or a worker pool that cannot be built. Unit parse
    /// failures are reported, not returned.
    pub fn run(
        &self,
        corpus: &Path,
        out_dir: &Path,
    ) -> Result<(BatchReport, ArtifactPaths), BatchError> {
        fs::create_dir_all(out_dir).map_err(BatchError::io(out_dir))?;

        let mut files = discover_units(corpus, self.options.filter.as_ref())?;
        if let Ok(out) = out_dir.canonicalize() {
            files.retain(|file| {
                file.path
                    .canonicalize()
                    .map_or(true, |path| !path.starts_with(&out))
            });
        }
        info!(
            "Validating {} units with {} job(s)",
            files.len(),
            self.options.jobs.max(1)
        );

        let outcomes = self.process_all(&files, out_dir)?;
        let units = assign_ids(outcomes);
        let summary = ValidationSummary::from_results(units.iter().map(|u| &u.outcome.result));

        let report = BatchReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            repository_commit: repository_commit(corpus),
            units,
            summary,
        };
        let paths = ReportWriter::new(out_dir).write(&report)?;
        info!(
            "Run complete: {}/{} passed",
            report.summary.units_passed, report.summary.units_validated
        );
        Ok((report, paths))
    }

    fn process_all(
        &self,
        files: &[UnitFile],
        out_dir: &Path,
    ) -> Result<Vec<UnitOutcome>, BatchError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs.max(1))
            .build()?;
        let done = AtomicUsize::new(0);
        let total = files.len();

        let mut outcomes: Vec<UnitOutcome> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let outcome = process_unit(file, out_dir)?;
                    let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
                    self.report_progress(finished, total, &outcome);
                    Ok(outcome)
                })
                .collect::<Result<Vec<UnitOutcome>, BatchError>>()
        })?;

        outcomes.sort_by(|a, b| a.file.relative.cmp(&b.file.relative));
        Ok(outcomes)
    }

    fn report_progress(&self, finished: usize, total: usize, outcome: &UnitOutcome) {
        let line = if self.options.verbose {
            format!(
                "[{}/{}] {}: {}",
                finished,
                total,
                outcome.file.relative.display(),
                outcome.result.status
            )
        } else {
            let every = self.options.progress_every;
            if finished != total && (every == 0 || finished % every != 0) {
                return;
            }
            format!(
                "Progress: {:.0}% ({}/{})",
                finished as f64 * 100.0 / total as f64,
                finished,
                total
            )
        };
        if let Ok(mut sink) = self.progress.lock() {
            let _ = writeln!(sink, "{}", line);
        }
    }
}

/// Assigns run-unique ids in corpus order; repeats get `-2`, `-3`, ...
fn assign_ids(outcomes: Vec<UnitOutcome>) -> Vec<ReportedUnit> {
    let mut used = HashSet::new();
    outcomes
        .into_iter()
        .map(|outcome| {
            let base = outcome.base_id();
            let mut id = base.clone();
            let mut n = 1;
            while !used.insert(id.clone()) {
                n += 1;
                id = base.with_suffix(n);
            }
            ReportedUnit { id, outcome }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mekparity_formats::Grammar;
    use mekparity_verify::ValidationResult;
    use std::path::PathBuf;

    fn outcome(relative: &str, chassis: &str, model: &str) -> UnitOutcome {
        UnitOutcome {
            file: UnitFile {
                path: PathBuf::from(relative),
                relative: PathBuf::from(relative),
                grammar: Grammar::LineOriented,
            },
            chassis: chassis.to_string(),
            model: model.to_string(),
            generated_path: None,
            result: ValidationResult::from_discrepancies(Vec::new()),
        }
    }

    #[test]
    fn duplicate_ids_get_numeric_suffixes() {
        let units = assign_ids(vec![
            outcome("a.mtf", "Atlas", "AS7-D"),
            outcome("b.mtf", "Atlas", "AS7-D"),
            outcome("c.mtf", "Atlas", "AS7-D"),
            outcome("broken unit.mtf", "", ""),
        ]);
        let ids: Vec<String> = units.iter().map(|u| u.id.to_string()).collect();
        assert_eq!(ids, vec!["atlas-as7-d", "atlas-as7-d-2", "atlas-as7-d-3", "broken-unit"]);
    }

    #[test]
    fn default_options_run_sequentially() {
        let options = BatchOptions::default();
        assert_eq!(options.jobs, 1);
        assert!(!options.verbose);
        assert!(options.filter.matches(Path::new("mechs/atlas.mtf")));
    }
}
