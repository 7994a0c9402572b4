pub mod compare;
pub mod parse;
pub mod render;
pub mod validate;

use mekparity_formats::Grammar;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Argument errors raised before any file is processed.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("cannot determine grammar for {}: expected a .mtf or .blk file", .0.display())]
    UnknownGrammar(PathBuf),
    #[error("grammar mismatch: {original} is {original_grammar}, {generated} is {generated_grammar}")]
    GrammarMismatch {
        original: String,
        original_grammar: Grammar,
        generated: String,
        generated_grammar: Grammar,
    },
}

pub fn grammar_for(path: &Path) -> Result<Grammar, CliError> {
    Grammar::from_path(path).ok_or_else(|| CliError::UnknownGrammar(path.to_path_buf()))
}
