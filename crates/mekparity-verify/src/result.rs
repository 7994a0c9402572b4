use crate::discrepancy::{DiscrepancyRecord, IssueCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Outcome of validating one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Regenerated text matches the original.
    Passed,
    /// At least one discrepancy was found.
    IssuesFound,
    /// The original (or regenerated) text could not be parsed.
    ParseError,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationStatus::Passed => "passed",
            ValidationStatus::IssuesFound => "issues_found",
            ValidationStatus::ParseError => "parse_error",
        })
    }
}

/// Per-unit validation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Status.
    pub status: ValidationStatus,
    /// Findings in emission order.
    pub discrepancies: Vec<DiscrepancyRecord>,
    /// Parse-error messages, for `ParseError` results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parse_errors: Vec<String>,
}

impl ValidationResult {
    /// Result for a comparison; `Passed` when there are no findings.
    pub fn from_discrepancies(discrepancies: Vec<DiscrepancyRecord>) -> Self {
        let status = if discrepancies.is_empty() {
            ValidationStatus::Passed
        } else {
            ValidationStatus::IssuesFound
        };
        Self {
            status,
            discrepancies,
            parse_errors: Vec::new(),
        }
    }

    /// Result for a unit that could not be parsed.
    ///
    /// Carries one `PARSE_ERROR` discrepancy so reports count it.
    pub fn parse_error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status: ValidationStatus::ParseError,
            discrepancies: vec![DiscrepancyRecord::new(
                IssueCategory::ParseError,
                "parseable unit file",
                message.clone(),
            )],
            parse_errors: vec![message],
        }
    }

    /// Returns true if the unit passed.
    pub fn is_passed(&self) -> bool {
        self.status == ValidationStatus::Passed
    }

    /// Category of the first discrepancy.
    pub fn primary_category(&self) -> Option<IssueCategory> {
        self.discrepancies.first().map(|d| d.category)
    }

    /// Number of discrepancies.
    pub fn issue_count(&self) -> usize {
        self.discrepancies.len()
    }
}

/// Run-level counts and category histogram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Units validated.
    pub units_validated: usize,
    /// Units that passed.
    pub units_passed: usize,
    /// Units with discrepancies.
    pub units_with_issues: usize,
    /// Units that failed to parse.
    pub units_with_parse_errors: usize,
    /// Discrepancy count per category.
    pub issues_by_category: BTreeMap<IssueCategory, usize>,
}

impl ValidationSummary {
    /// Reduces a set of results into a summary.
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ValidationResult>,
    {
        let mut summary = Self::default();
        for result in results {
            summary.record(result);
        }
        summary
    }

    /// Adds one result.
    pub fn record(&mut self, result: &ValidationResult) {
        self.units_validated += 1;
        match result.status {
            ValidationStatus::Passed => self.units_passed += 1,
            ValidationStatus::IssuesFound => self.units_with_issues += 1,
            ValidationStatus::ParseError => self.units_with_parse_errors += 1,
        }
        for discrepancy in &result.discrepancies {
            *self
                .issues_by_category
                .entry(discrepancy.category)
                .or_insert(0) += 1;
        }
    }

    /// Fraction of units that passed, in percent. Zero for an empty run.
    pub fn pass_rate(&self) -> f64 {
        if self.units_validated == 0 {
            0.0
        } else {
            self.units_passed as f64 * 100.0 / self.units_validated as f64
        }
    }

    /// Most frequent categories, highest count first, ties in category order.
    pub fn top_categories(&self, limit: usize) -> Vec<(IssueCategory, usize)> {
        let mut ranked: Vec<_> = self
            .issues_by_category
            .iter()
            .map(|(category, count)| (*category, *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Returns true if any unit had issues or failed to parse.
    pub fn has_failures(&self) -> bool {
        self.units_with_issues > 0 || self.units_with_parse_errors > 0
    }
}
