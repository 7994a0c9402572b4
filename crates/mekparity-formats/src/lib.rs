//! Unit-file grammars.
//!
//! Two grammars are supported: the line-oriented `key:value` grammar
//! ([`MtfFormat`]) and the tag-block grammar ([`BlkFormat`]). Each has a
//! tokenizer producing a [`RawFieldMap`], a builder turning that map into a
//! [`CanonicalUnitRecord`](mekparity_canonical::CanonicalUnitRecord), and a
//! deterministic serializer.
//!
//! # Example
//!
//! ```rust
//! use mekparity_formats::{Grammar, UnitFormat, MtfFormat};
//!
//! let text = "chassis:Locust\nmodel:LCT-1V\nConfig:Biped\nmass:20\n";
//! let parsed = MtfFormat.parse(text)?;
//! assert_eq!(parsed.record.chassis, "Locust");
//!
//! let rendered = Grammar::LineOriented.render(&parsed.record);
//! assert!(rendered.starts_with("chassis:Locust\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![deny(missing_docs)]

/// Tag-block reader.
pub mod blk_reader;
/// Tag-block writer.
pub mod blk_writer;
pub mod equipment;
/// Parse errors.
pub mod errors;
/// Grammar trait and dispatch.
pub mod format;
pub mod mtf_reader;
/// Line-oriented writer.
pub mod mtf_writer;
pub mod raw;

pub use errors::ParseError;
pub use format::{read_unit_file, BlkFormat, Grammar, MtfFormat, ParsedUnit, UnitFormat};
pub use raw::{RawEquipment, RawFieldMap, RawValue};
