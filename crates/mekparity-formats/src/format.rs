use crate::errors::ParseError;
use crate::{blk_reader, blk_writer, mtf_reader, mtf_writer};
use mekparity_canonical::{CanonicalUnitRecord, NormalizationReport};
use std::fmt;
use std::path::Path;

/// A record together with the notes gathered while building it.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    /// The built record.
    pub record: CanonicalUnitRecord,
    /// Normalization notes and metric counters.
    pub report: NormalizationReport,
}

/// A unit-file grammar: text in, record out, and back.
pub trait UnitFormat: Send + Sync {
    /// Which grammar this is.
    fn grammar(&self) -> Grammar;

    /// Tokenizes and builds a record.
    fn parse(&self, text: &str) -> Result<ParsedUnit, ParseError>;

    /// Serializes a record. Deterministic: equal records give equal text.
    fn render(&self, record: &CanonicalUnitRecord) -> String;
}

/// Line-oriented `key:value` grammar (`.mtf`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MtfFormat;

/// Tag-block `<Tag>...</Tag>` grammar (`.blk`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BlkFormat;

impl UnitFormat for MtfFormat {
    fn grammar(&self) -> Grammar {
        Grammar::LineOriented
    }

    fn parse(&self, text: &str) -> Result<ParsedUnit, ParseError> {
        mtf_reader::read_record(text)
    }

    fn render(&self, record: &CanonicalUnitRecord) -> String {
        mtf_writer::write_record(record)
    }
}

impl UnitFormat for BlkFormat {
    fn grammar(&self) -> Grammar {
        Grammar::TagBlock
    }

    fn parse(&self, text: &str) -> Result<ParsedUnit, ParseError> {
        blk_reader::read_record(text)
    }

    fn render(&self, record: &CanonicalUnitRecord) -> String {
        blk_writer::write_record(record)
    }
}

/// The two supported grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// `.mtf` files.
    LineOriented,
    /// `.blk` files.
    TagBlock,
}

impl Grammar {
    /// Every grammar.
    pub const ALL: [Grammar; 2] = [Grammar::LineOriented, Grammar::TagBlock];

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Grammar::LineOriented => "mtf",
            Grammar::TagBlock => "blk",
        }
    }

    /// Grammar for a file extension, case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|g| g.extension().eq_ignore_ascii_case(extension))
    }

    /// Grammar for a path, by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// The format implementation.
    pub fn format(&self) -> &'static dyn UnitFormat {
        match self {
            Grammar::LineOriented => &MtfFormat,
            Grammar::TagBlock => &BlkFormat,
        }
    }

    /// Parses text in this grammar.
    pub fn parse(&self, text: &str) -> Result<ParsedUnit, ParseError> {
        self.format().parse(text)
    }

    /// Renders a record in this grammar.
    pub fn render(&self, record: &CanonicalUnitRecord) -> String {
        self.format().render(record)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Reads and parses a unit file, picking the grammar by extension.
///
/// # Errors
///
/// Returns [`ParseError::UnsupportedFormat`] for unknown extensions,
/// [`ParseError::Io`] if the file cannot be read, and any grammar error.
pub fn read_unit_file(path: &Path) -> Result<(Grammar, ParsedUnit), ParseError> {
    let grammar = Grammar::from_path(path)
        .ok_or_else(|| ParseError::UnsupportedFormat(path.display().to_string()))?;
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok((grammar, grammar.parse(&text)?))
}
