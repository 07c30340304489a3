//! Command-line flags, the optional TOML config file, and their merge.
//!
//! Precedence: CLI flag (or its environment variable) > config file > default.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::client::ClientConfig;

const AREAS_FILE: &str = "areas.json";
const DEFAULT_DB: &str = "forecast_data.db";
const DEFAULT_LOG_FILE: &str = "tenki.log";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug, Default)]
#[command(name = "tenki", version, about = "Browse JMA 3-day forecasts by region")]
pub struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Area document (defaults to areas.json next to the executable).
  #[arg(long, env = "TENKI_AREAS", value_name = "PATH")]
  pub areas: Option<PathBuf>,

  /// Base URL of the forecast endpoint.
  #[arg(long, env = "TENKI_BASE_URL")]
  pub base_url: Option<String>,

  /// SQLite cache file.
  #[arg(long, env = "TENKI_DB", value_name = "PATH")]
  pub db: Option<PathBuf>,

  /// Do not read or write the local cache.
  #[arg(long)]
  pub no_cache: bool,

  /// HTTP timeout in seconds.
  #[arg(long, value_name = "SECS")]
  pub timeout: Option<u64>,

  /// Where log output goes while the terminal UI is running.
  #[arg(long, env = "TENKI_LOG_FILE", value_name = "PATH")]
  pub log_file: Option<PathBuf>,

  /// Print every cached row and exit.
  #[arg(long)]
  pub dump: bool,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
  pub areas:        Option<PathBuf>,
  pub base_url:     Option<String>,
  pub db:           Option<PathBuf>,
  pub cache:        Option<bool>,
  pub timeout_secs: Option<u64>,
  pub log_file:     Option<PathBuf>,
}

impl ConfigFile {
  pub fn read(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

// ─── Resolved settings ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Settings {
  pub areas:    PathBuf,
  pub db:       Option<PathBuf>,
  pub client:   ClientConfig,
  pub log_file: PathBuf,
  pub dump:     bool,
}

impl Settings {
  /// Merge `args` over the config file it names (if any).
  pub fn load(args: Args) -> Result<Self> {
    let file = match &args.config {
      Some(path) => ConfigFile::read(path)?,
      None => ConfigFile::default(),
    };
    Ok(Self::merge(args, file))
  }

  pub fn merge(args: Args, file: ConfigFile) -> Self {
    let cache = !args.no_cache && file.cache.unwrap_or(true);
    let defaults = ClientConfig::default();

    Self {
      areas:    args.areas.or(file.areas).unwrap_or_else(default_areas_path),
      db:       cache.then(|| args.db.or(file.db).unwrap_or_else(|| DEFAULT_DB.into())),
      client:   ClientConfig {
        base_url: args.base_url.or(file.base_url).unwrap_or(defaults.base_url),
        timeout:  args
          .timeout
          .or(file.timeout_secs)
          .map(Duration::from_secs)
          .unwrap_or(defaults.timeout),
      },
      log_file: args
        .log_file
        .or(file.log_file)
        .unwrap_or_else(|| DEFAULT_LOG_FILE.into()),
      dump:     args.dump,
    }
  }
}

/// `areas.json` beside the running executable, or in the working directory
/// when the executable path is unavailable.
fn default_areas_path() -> PathBuf {
  std::env::current_exe()
    .ok()
    .and_then(|exe| exe.parent().map(|dir| dir.join(AREAS_FILE)))
    .unwrap_or_else(|| PathBuf::from(AREAS_FILE))
}
