//! # repo2md Library
//!
//! Select files from a directory tree with include/exclude glob patterns and
//! bundle them into one Markdown document. Every file becomes an HTML comment
//! carrying its path, followed by a fenced code block tagged with its language:
//!
//! ````markdown
//! <!-- src/main.rs -->
//! ```rust
//! fn main() {}
//! ```
//! ````
//!
//! Files are ordered by file name (case-insensitive), so the same selection
//! always produces the same document.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use repo2md::{Config, run_repo2md};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config {
//!         include: vec!["src/**/*.rs".into(), "README.md".into()],
//!         exclude: vec!["src/bin/**".into()],
//!         base_dir: std::env::current_dir()?,
//!         output_path: Some(PathBuf::from("bundle.md")),
//!         quiet: false,
//!         verbosity: 0,
//!     };
//!
//!     run_repo2md(config).await
//! }
//! ```

pub mod cli;
pub mod filewalker;
pub mod report;
pub mod utils;
pub mod writer;

pub use cli::Config;
pub use filewalker::{glob_files, resolve_pattern, select_files, sort_files};
pub use report::report_files;
pub use writer::{MarkdownWriter, render_markdown};

use anyhow::{Context, Result, bail};
use log::info;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWrite;

/// Bundle the files selected by `config` into a Markdown document.
///
/// Nothing is written when the selection ends up empty.
pub async fn run_repo2md(config: Config) -> Result<()> {
    let base_dir = resolve_base_dir(&config.base_dir)?;
    info!("Base directory: {}", base_dir.display());

    let include_files = glob_files(&config.include, &base_dir)?;
    let exclude_files = glob_files(&config.exclude, &base_dir)?;

    let final_files = select_files(&include_files, &exclude_files);
    if final_files.is_empty() {
        bail!("No files matched after applying exclusions.");
    }

    let sorted_files = sort_files(final_files);
    info!("Bundling {} file(s)", sorted_files.len());

    if !config.quiet {
        report_files(&mut std::io::stderr().lock(), &sorted_files, &base_dir)
            .context("Failed to write file list to stderr")?;
    }

    let markdown = render_markdown(&sorted_files, &base_dir).await?;

    match &config.output_path {
        Some(path) => {
            let file = File::create(path)
                .await
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_markdown(file, &markdown).await?;
            info!("Wrote: {}", path.display());
        }
        None => write_markdown(tokio::io::stdout(), &markdown).await?,
    }

    Ok(())
}

/// Canonicalizes the base directory, failing if it is missing or not a directory.
fn resolve_base_dir(dir: &Path) -> Result<PathBuf> {
    match dunce::canonicalize(dir) {
        Ok(path) if path.is_dir() => Ok(path),
        Ok(path) => bail!("Base directory '{}' is not a directory.", path.display()),
        Err(_) => {
            let shown = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
            bail!("Base directory '{}' is not a directory.", shown.display())
        }
    }
}

async fn write_markdown<W: AsyncWrite + Unpin>(sink: W, markdown: &str) -> Result<()> {
    let mut md_writer = MarkdownWriter::new(sink);
    md_writer.write_document(markdown).await?;
    md_writer.flush().await
}
