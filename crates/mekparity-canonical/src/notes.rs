use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stage of a normalization cascade that produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "stage", content = "rule")]
pub enum Resolution {
    /// The input was the value's canonical text.
    Canonical,
    /// The input matched an alias-table entry.
    Alias,
    /// The input matched the keyword rule at this table index.
    Rule(usize),
    /// A keyword rule matched and tech-base context picked the variant.
    TechContext,
    /// Nothing matched; the documented default was used.
    Default,
}

/// One informational note produced while building a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationNote {
    /// Field the note refers to.
    pub field: String,
    /// Raw source text.
    pub raw: String,
    /// Canonical text of the resolved value.
    pub resolved: String,
    /// How the value was resolved.
    pub resolution: Resolution,
}

/// Notes collected while normalizing one unit.
///
/// Notes are never discrepancies; they explain inferred or defaulted values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationReport {
    /// Notes in the order fields were normalized.
    pub notes: Vec<NormalizationNote>,
    /// Counters such as defaulted fields or clamped values.
    pub metrics: BTreeMap<String, u64>,
}

impl NormalizationReport {
    /// Appends a note and bumps the counter for its resolution stage.
    pub fn push(&mut self, note: NormalizationNote) {
        let key = match note.resolution {
            Resolution::Default => "defaulted",
            Resolution::TechContext => "tech_context",
            _ => "inferred",
        };
        self.bump(key);
        self.notes.push(note);
    }

    /// Increments a named counter.
    pub fn bump(&mut self, metric: &str) {
        self.metrics
            .entry(metric.to_string())
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    /// Returns true if every field resolved exactly.
    pub fn is_exact(&self) -> bool {
        self.notes.is_empty() && self.metrics.is_empty()
    }
}
