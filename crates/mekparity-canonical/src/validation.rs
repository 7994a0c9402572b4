use thiserror::Error;

/// Validation errors for canonical primitives and records.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a numeric quantity exceeds its bounds.
    #[error("{field} ({value}) is out of bounds")]
    OutOfBounds {
        /// Field name that is out of bounds.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// A critical-slot list is longer than its location allows.
    #[error("{location} holds {len} slots, capacity is {capacity}")]
    CapacityExceeded {
        /// Location display name.
        location: &'static str,
        /// Number of slots present.
        len: usize,
        /// Fixed capacity of the location.
        capacity: usize,
    },
    /// A location does not belong to the record's configuration.
    #[error("{location} is not a location of a {configuration} unit")]
    ForeignLocation {
        /// Location display name.
        location: &'static str,
        /// Configuration display name.
        configuration: &'static str,
    },
}
