use anyhow::Result;
use log::LevelFilter;
use repo2md::{cli::parse_args, run_repo2md};

#[tokio::main]
async fn main() -> Result<()> {
    let config = parse_args()?;
    init_logger(config.verbosity);
    run_repo2md(config).await
}

/// Logs go to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
