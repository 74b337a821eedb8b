//! pydoc-crawler CLI
//!
//! Runs one scraping mode and hands its table to the selected output.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use pydoc_crawler::{
    error::Result,
    models::Config,
    output::{self, OutputContext, OutputFormat},
    pipeline::{self, Context, Mode},
    services::PageFetcher,
    storage::DiskCache,
    utils::{http, log as logging},
};

/// Python documentation parser
#[derive(Parser, Debug)]
#[command(
    name = "pydoc-crawler",
    version,
    about = "Python documentation and PEP index parser"
)]
struct Cli {
    /// Parser mode
    #[arg(value_enum)]
    mode: Mode,

    /// Clear the response cache before running
    #[arg(short, long)]
    clear_cache: bool,

    /// Additional output format (default: one row per line)
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Path to the configuration file
    #[arg(long, default_value = "pydoc-crawler.toml")]
    config: PathBuf,

    /// Base directory for cache, downloads, results and logs
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The logger itself is configured from the file, so load errors go to stderr.
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match logging::init(&config.logging, &config.paths.logs_path(), cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("Parser started");
    log::info!("Command line arguments: {:?}", cli);

    match run(&cli, config).await {
        Ok(()) => {
            log::info!("Parser finished.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("An error occurred: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Read the config file (defaults only when it is absent) and apply CLI overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_if_exists(&cli.config)?;
    if let Some(dir) = &cli.base_dir {
        config.paths.base_dir = dir.clone();
    }
    if let Some(secs) = cli.timeout {
        config.http.timeout_secs = secs;
    }
    Ok(config)
}

async fn run(cli: &Cli, config: Config) -> Result<()> {
    config.validate()?;
    let config = Arc::new(config);

    let client = http::create_client(&config.http)?;
    let cache = Arc::new(DiskCache::new(config.paths.cache_path()));
    let fetcher = PageFetcher::new(client, cache, config.http.encoding.as_str());

    if cli.clear_cache {
        fetcher.clear_cache().await?;
        log::info!("Response cache cleared");
    }

    let context = Context::new(Arc::clone(&config), fetcher);
    let mut outcome = pipeline::run(cli.mode, &context).await?;
    outcome.soft_failures.flush();

    if let Some(table) = &outcome.table {
        let output_context = OutputContext {
            mode: cli.mode,
            results_dir: config.paths.results_path(),
        };
        output::sink_for(cli.output.unwrap_or_default()).emit(table, &output_context)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(config: &std::path::Path, extra: &[&str]) -> Cli {
        let mut args = vec!["pydoc-crawler", "pep", "--config"];
        args.push(config.to_str().unwrap());
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pydoc-crawler.toml");
        std::fs::write(&path, "[http\ntimeout_secs = ").unwrap();

        assert!(load_config(&parse(&path, &[])).is_err());
    }

    #[test]
    fn test_missing_config_uses_defaults_with_overrides() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");

        let config = load_config(&parse(&path, &["--timeout", "7", "--base-dir", "/srv/pydoc"])).unwrap();
        assert_eq!(config.http.timeout_secs, 7);
        assert_eq!(config.paths.base_dir, PathBuf::from("/srv/pydoc"));
        assert_eq!(config.http.max_concurrent, 5);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pydoc-crawler.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = 60\nmax_concurrent = 2\n").unwrap();

        let config = load_config(&parse(&path, &["--timeout", "3"])).unwrap();
        assert_eq!(config.http.timeout_secs, 3);
        assert_eq!(config.http.max_concurrent, 2);
    }
}
