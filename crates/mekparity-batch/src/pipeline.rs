//! Per-unit pipeline: read, parse, render, write, compare.

use crate::corpus::UnitFile;
use crate::error::BatchError;
use mekparity_canonical::UnitId;
use mekparity_formats::ParseError;
use mekparity_verify::{Comparator, ValidationResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of running one unit file through the pipeline.
#[derive(Debug, Clone)]
pub struct UnitOutcome {
    /// The processed file.
    pub file: UnitFile,
    /// Chassis name; empty when the file failed to parse.
    pub chassis: String,
    /// Model designation; empty when the file failed to parse.
    pub model: String,
    /// Where the regenerated text was written.
    pub generated_path: Option<PathBuf>,
    /// Comparison result.
    pub result: ValidationResult,
}

impl UnitOutcome {
    /// Base id before de-duplication: `chassis-model`, or the file stem
    /// when the unit did not parse.
    pub fn base_id(&self) -> UnitId {
        if self.chassis.is_empty() {
            let stem = self
                .file
                .relative
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            UnitId::from_text(&stem)
        } else {
            UnitId::from_names(&self.chassis, &self.model)
        }
    }
}

/// Runs one file through the pipeline.
///
/// Unreadable or unparseable sources become `ParseError` results. Only a
/// failure to write the regenerated text is returned as an error.
pub fn process_unit(file: &UnitFile, out_dir: &Path) -> Result<UnitOutcome, BatchError> {
    let parse_failure = |message: String| {
        warn!("Parse failure in {:?}: {}", file.relative, message);
        UnitOutcome {
            file: file.clone(),
            chassis: String::new(),
            model: String::new(),
            generated_path: None,
            result: ValidationResult::parse_error(message),
        }
    };

    let bytes = match fs::read(&file.path) {
        Ok(bytes) => bytes,
        Err(e) => return Ok(parse_failure(ParseError::Io(e).to_string())),
    };
    let original = String::from_utf8_lossy(&bytes);
    let parsed = match file.grammar.parse(&original) {
        Ok(parsed) => parsed,
        Err(e) => return Ok(parse_failure(e.to_string())),
    };
    let generated = file.grammar.render(&parsed.record);

    let generated_path = out_dir.join("generated").join(&file.relative);
    if let Some(parent) = generated_path.parent() {
        fs::create_dir_all(parent).map_err(BatchError::io(parent))?;
    }
    fs::write(&generated_path, &generated).map_err(BatchError::io(&generated_path))?;

    let result = Comparator::new().compare(file.grammar, &original, &generated);
    debug!(
        path = %file.relative.display(),
        status = %result.status,
        issues = result.issue_count(),
        "validated unit"
    );

    Ok(UnitOutcome {
        file: file.clone(),
        chassis: parsed.record.chassis,
        model: parsed.record.model,
        generated_path: Some(generated_path),
        result,
    })
}
