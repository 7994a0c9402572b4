//! Compare command implementation.

use super::{grammar_for, CliError};
use crate::output;
use mekparity_verify::Comparator;
use std::path::PathBuf;

pub fn run(
    original: PathBuf,
    generated: PathBuf,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let original_grammar = grammar_for(&original)?;
    let generated_grammar = grammar_for(&generated)?;
    if original_grammar != generated_grammar {
        return Err(CliError::GrammarMismatch {
            original: original.display().to_string(),
            original_grammar,
            generated: generated.display().to_string(),
            generated_grammar,
        }
        .into());
    }

    let original_text = std::fs::read(&original)
        .map_err(|e| format!("Failed to read {}: {}", original.display(), e))?;
    let generated_text = std::fs::read(&generated)
        .map_err(|e| format!("Failed to read {}: {}", generated.display(), e))?;

    let result = Comparator::new().compare(
        original_grammar,
        &String::from_utf8_lossy(&original_text),
        &String::from_utf8_lossy(&generated_text),
    );

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Status: {}", result.status);
        if !result.discrepancies.is_empty() {
            output::print_discrepancy_table(&result.discrepancies);
        }
    }

    if !result.is_passed() {
        std::process::exit(1);
    }

    Ok(())
}
