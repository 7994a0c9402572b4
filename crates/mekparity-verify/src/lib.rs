//! Round-trip verification for regenerated unit files.
//!
//! The [`Comparator`] reads an original and a regenerated text in the same
//! grammar and reports every semantic difference as a
//! [`DiscrepancyRecord`]. Differences are data, not errors: a comparison
//! always yields a [`ValidationResult`].
//!
//! Core invariants:
//! - Comparing a text with itself yields no discrepancies
//! - Trailing empty slots never produce a finding
//! - The comparator never panics on malformed input
//!
#![deny(missing_docs)]

/// Comparator and slot classification.
pub mod comparator;
/// Discrepancy taxonomy.
pub mod discrepancy;
/// Comparable extraction from raw text.
pub mod extract;
pub mod normalize;
/// Per-unit results and run summaries.
pub mod result;

pub use comparator::{compare_slots, is_actuator, trim_trailing_empty, Comparator, ACTUATORS};
pub use discrepancy::{DiscrepancyRecord, IssueCategory};
pub use extract::{ComparableUnit, EquipmentKey};
pub use result::{ValidationResult, ValidationStatus, ValidationSummary};
