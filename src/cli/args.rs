//! Command-line argument parsing for vod_fetcher
//!
//! This module defines the CLI structure using clap derive macros and the
//! validation that turns raw flags into the run configuration consumed by
//! the pipeline. Validation happens entirely here, before the pipeline is
//! invoked.

use std::path::PathBuf;

use clap::Parser;
use regex::{Regex, RegexBuilder};

use crate::app::models::QualityTier;
use crate::app::pipeline::RunConfig;
use crate::constants::env as env_constants;
use crate::errors::{ConfigError, ConfigResult};

/// vod_fetcher - resolve and download catalog videos
#[derive(Parser, Debug)]
#[command(
    name = "vod_fetcher",
    version,
    about = "Resolve and download videos from the Giant Bomb catalog API",
    long_about = "Resolves a fuzzy show/video query against the catalog API and downloads the
matching video at the requested quality. Results are cached on disk so
repeated identical queries avoid redundant network calls."
)]
pub struct Cli {
    /// Individual API key for the catalog API
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Search shows for the first title matching this regex
    #[arg(long, value_name = "REGEX")]
    pub show_regex: Option<String>,

    /// Search the show for the first video name matching this regex
    #[arg(long, value_name = "REGEX")]
    pub video_regex: Option<String>,

    /// Video number to download (most recent = 0)
    #[arg(long, value_name = "N")]
    pub video_number: Option<usize>,

    /// Consider only premium videos
    #[arg(long)]
    pub only_premium: bool,

    /// Consider only free videos
    #[arg(long, conflicts_with = "only_premium")]
    pub only_free: bool,

    /// Video quality to download (highest/hd/high/low/mobile)
    #[arg(long, value_name = "TIER", default_value = "highest")]
    pub quality: String,

    /// Output directory for the downloaded file
    #[arg(long, value_name = "DIR", default_value = "./")]
    pub out_dir: PathBuf,

    /// Show selected video info instead of downloading
    #[arg(long)]
    pub info: bool,

    /// Ignore previously cached results for this query
    #[arg(long)]
    pub clean: bool,

    /// Show debug output and transfer progress
    #[arg(long)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Cache directory path
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Compile a user-supplied pattern, case-insensitive like the search it feeds
fn compile_pattern(source: &str) -> ConfigResult<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidPattern {
            pattern: source.to_string(),
            source: e,
        })
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.debug {
            tracing::Level::DEBUG
        } else if self.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }

    /// Validate flags and build the pipeline run configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the API key is missing from both the flag
    /// and the environment, the show regex is absent, neither video selector
    /// is given, a pattern fails to compile, or the quality name is unknown.
    pub fn run_config(&self) -> ConfigResult<RunConfig> {
        let api_key = self
            .api_key
            .clone()
            .or_else(|| std::env::var(env_constants::API_KEY).ok())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let show_source = self
            .show_regex
            .as_deref()
            .ok_or(ConfigError::MissingShowRegex)?;
        let show_regex = compile_pattern(show_source)?;

        if self.video_regex.is_none() && self.video_number.is_none() {
            return Err(ConfigError::MissingVideoSelector);
        }
        let video_regex = self
            .video_regex
            .as_deref()
            .map(compile_pattern)
            .transpose()?;

        let quality: QualityTier = self.quality.parse()?;

        // Ordered filter list; never mutated after this point
        let mut filters = Vec::new();
        if self.only_premium {
            filters.push("premium:true".to_string());
        } else if self.only_free {
            filters.push("premium:false".to_string());
        }

        Ok(RunConfig {
            api_key,
            show_regex,
            video_regex,
            video_number: self.video_number.unwrap_or(0),
            filters,
            quality,
            out_dir: self.out_dir.clone(),
            info_only: self.info,
            clean_cache: self.clean,
        })
    }
}
