// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `bundlegen`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bundlegen",
    version,
    about = "Generate the production config and bundle hooks, webhooks and operations.",
    long_about = "Bundles the config entry point, runs it to generate the production \
config, then bundles the server hooks, webhooks and operations in parallel. \
All files are written below <dir>/generated/bundle. The local introspection \
cache has precedence; pass --no-cache to bypass it."
)]
pub struct CliArgs {
    /// Project directory containing the entry points.
    #[arg(long, value_name = "DIR", default_value = ".bundlegen")]
    pub dir: PathBuf,

    /// Path to the config file (TOML).
    ///
    /// Default: `bundlegen.toml` inside `--dir`. A missing default file is
    /// not an error.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable the local introspection cache.
    #[arg(long)]
    pub no_cache: bool,

    /// Disable loading resources from the network.
    #[arg(long)]
    pub offline: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUNDLEGEN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Plan the pipeline and print it, but don't bundle or run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
