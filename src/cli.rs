use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

pub struct Config {
    /// Glob patterns selecting the files to bundle.
    pub include: Vec<String>,
    /// Glob patterns removed from the selection after inclusion.
    pub exclude: Vec<String>,
    /// Directory relative patterns are resolved against.
    pub base_dir: PathBuf,
    /// Destination file; standard output when `None`.
    pub output_path: Option<PathBuf>,
    /// Suppress the `Adding …` notices on standard error.
    pub quiet: bool,
    /// Log verbosity (number of -v flags).
    pub verbosity: u8,
}

/// Bundle repository files into one Markdown document.
///
/// PATTERN takes one or more shell-style glob patterns ("src/**/*.rs"). Quote
/// them if your shell would expand them. Use -x/--exclude to drop matches.
/// Output is ordered by file name, case-insensitively.
#[derive(Debug, Parser)]
#[command(name = "repo2md", version, max_term_width = 100)]
struct Args {
    /// Glob patterns of files to include
    #[arg(value_name = "PATTERN", required = true, num_args = 1..)]
    include: Vec<String>,

    /// Glob patterns to remove after inclusion (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN", action = ArgAction::Append)]
    exclude: Vec<String>,

    /// Directory against which patterns are evaluated [default: current directory]
    #[arg(short = 'B', long = "base-dir", value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Write Markdown to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Suppress file list on stderr
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

pub fn parse_args() -> Result<Config> {
    into_config(Args::parse())
}

fn into_config(args: Args) -> Result<Config> {
    let base_dir = match args.base_dir {
        Some(dir) => expand_tilde(&dir),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    Ok(Config {
        include: args.include,
        exclude: args.exclude,
        base_dir,
        output_path: args.output,
        quiet: args.quiet,
        verbosity: args.verbose,
    })
}

/// Replaces a leading `~` component with the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
