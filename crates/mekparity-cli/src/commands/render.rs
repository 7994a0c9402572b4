//! Render command implementation.

use mekparity_formats::read_unit_file;
use std::path::PathBuf;

pub fn run(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let (grammar, parsed) = read_unit_file(&file)?;
    print!("{}", grammar.render(&parsed.record));
    Ok(())
}
