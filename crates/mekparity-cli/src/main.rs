//! mekparity CLI - parse, render and round-trip validate unit files.

use clap::{Parser, Subcommand, ValueEnum};
use mekparity_formats::Grammar;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{compare, parse, render, validate};

#[derive(Parser)]
#[command(name = "mekparity")]
#[command(about = "Unit-file round-trip validation CLI")]
struct Cli {
    /// Log run milestones and print one progress line per file
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Grammar selector for `--format`.
#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Line-oriented `.mtf`
    Mtf,
    /// Tag-block `.blk`
    Blk,
}

impl From<FormatArg> for Grammar {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Mtf => Grammar::LineOriented,
            FormatArg::Blk => Grammar::TagBlock,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Round-trip every unit file under a corpus directory
    Validate {
        /// Corpus root directory
        corpus: PathBuf,
        /// Output directory for reports and regenerated files
        #[arg(long)]
        out: PathBuf,
        /// Worker threads
        #[arg(long, default_value_t = 1)]
        jobs: usize,
        /// In quiet mode, print progress every N files
        #[arg(long, default_value_t = 50)]
        progress_every: usize,
        /// Only process files whose path contains SUBSTR
        #[arg(long, value_name = "SUBSTR")]
        include: Option<String>,
        /// Only process files of one grammar
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Parse a unit file and print its canonical record
    Parse {
        /// Unit file (.mtf or .blk)
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the regenerated text of a unit file
    Render {
        /// Unit file (.mtf or .blk)
        file: PathBuf,
    },
    /// Compare an original unit file with a regenerated one
    Compare {
        /// Original unit file
        original: PathBuf,
        /// Regenerated unit file
        generated: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            corpus,
            out,
            jobs,
            progress_every,
            include,
            format,
        } => validate::run(validate::ValidateArgs {
            corpus,
            out,
            jobs,
            verbose: cli.verbose,
            progress_every,
            include,
            grammar: format.map(Grammar::from),
        }),
        Commands::Parse { file, json } => parse::run(file, json),
        Commands::Render { file } => render::run(file),
        Commands::Compare {
            original,
            generated,
            json,
        } => compare::run(original, generated, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
