//! vod_fetcher CLI application
//!
//! Command-line interface for resolving and downloading catalog videos.
//! Maps the pipeline's terminal outcome to distinct exit codes so callers
//! can tell "no match" (1) from transport and download errors (2).

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use vod_fetcher::app::Outcome;
use vod_fetcher::cli::{self, Cli};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    init_logging(&cli);

    info!("vod_fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    match cli::run(cli).await {
        Ok(Outcome::NotFound(kind)) => {
            eprintln!("no {} found for query", kind);
            process::exit(1);
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("vod_fetcher={}", log_level).parse().unwrap());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.debug)
        .init();
}
