//! Parse command implementation.

use crate::output;
use mekparity_canonical::record_digest;
use mekparity_formats::read_unit_file;
use serde_json::json;
use std::path::PathBuf;

pub fn run(file: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (grammar, parsed) = read_unit_file(&file)?;
    let digest = record_digest(&parsed.record)?;

    if json_output {
        let value = json!({
            "grammar": grammar.extension(),
            "digest": digest.to_string(),
            "record": parsed.record,
            "normalization": parsed.report,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&parsed.record)?);
        println!("Digest: {}", digest);
        output::print_normalization(&parsed.report);
    }

    Ok(())
}
