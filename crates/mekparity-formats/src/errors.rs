use mekparity_canonical::ValidationError;
use thiserror::Error;

/// Errors that can occur while reading a unit file.
///
/// Parse errors are per unit: a batch run records them and moves on.
#[derive(Error, Debug)]
pub enum ParseError {
    /// One or more mandatory fields are missing or blank.
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<String>),
    /// The `<UnitType>` token is not in the closed lookup table.
    #[error("unrecognized unit type '{0}'")]
    UnknownUnitType(String),
    /// A tag was opened but never closed.
    #[error("unterminated tag <{tag}> opened at line {line}")]
    UnterminatedTag {
        /// Tag name as written.
        tag: String,
        /// 1-based line of the opening tag.
        line: usize,
    },
    /// The file extension does not name a known grammar.
    #[error("unsupported unit file: {0}")]
    UnsupportedFormat(String),
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The built record violates a record invariant.
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] ValidationError),
}

impl ParseError {
    /// Names of the missing fields, if this is a missing-field error.
    pub fn missing_fields(&self) -> &[String] {
        match self {
            ParseError::MissingFields(fields) => fields,
            _ => &[],
        }
    }
}
