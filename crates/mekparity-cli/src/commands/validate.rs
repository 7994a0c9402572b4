//! Validate command implementation.

use crate::output;
use mekparity_batch::{
    AllFiles, AndFilter, BatchOptions, BatchRunner, GrammarFilter, PathContainsFilter,
    UnitFileFilter,
};
use mekparity_formats::Grammar;
use std::path::PathBuf;
use tracing::debug;

pub struct ValidateArgs {
    pub corpus: PathBuf,
    pub out: PathBuf,
    pub jobs: usize,
    pub verbose: bool,
    pub progress_every: usize,
    pub include: Option<String>,
    pub grammar: Option<Grammar>,
}

fn build_filter(include: Option<String>, grammar: Option<Grammar>) -> Box<dyn UnitFileFilter> {
    let mut filters: Vec<Box<dyn UnitFileFilter>> = Vec::new();
    if let Some(needle) = include {
        filters.push(Box::new(PathContainsFilter { needle }));
    }
    if let Some(grammar) = grammar {
        filters.push(Box::new(GrammarFilter { grammar }));
    }
    match filters.len() {
        0 => Box::new(AllFiles),
        1 => filters.remove(0),
        _ => Box::new(AndFilter { filters }),
    }
}

pub fn run(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = BatchOptions {
        jobs: args.jobs,
        verbose: args.verbose,
        progress_every: args.progress_every,
        filter: build_filter(args.include, args.grammar),
    };
    debug!(?options, corpus = %args.corpus.display(), "starting validation");

    let (report, paths) = BatchRunner::new(options).run(&args.corpus, &args.out)?;
    output::print_summary(&report.summary, &paths);

    if report.summary.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
