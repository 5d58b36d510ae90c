//! Application configuration.
//!
//! Values resolve with priority: `config.toml` > environment (`.env` is
//! loaded first) > built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default cap on due cards returned by the study queue
pub const DEFAULT_REVIEW_LIMIT: usize = 50;

/// Default cap on never-reviewed cards mixed into the study queue
pub const DEFAULT_NEW_CARD_LIMIT: usize = 20;

/// Times a review is recomputed after losing a compare-and-swap
pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  pub database_path: PathBuf,
  pub server_host: String,
  pub server_port: u16,
  pub review_limit: usize,
  pub new_card_limit: usize,
  pub max_conflict_retries: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_path: PathBuf::from("data/flashdeck.db"),
      server_host: "0.0.0.0".to_string(),
      server_port: 3000,
      review_limit: DEFAULT_REVIEW_LIMIT,
      new_card_limit: DEFAULT_NEW_CARD_LIMIT,
      max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
    }
  }
}

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
  database: Option<DatabaseSection>,
  server: Option<ServerSection>,
  study: Option<StudySection>,
  review: Option<ReviewSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
  path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
  host: Option<String>,
  port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct StudySection {
  review_limit: Option<usize>,
  new_card_limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ReviewSection {
  max_conflict_retries: Option<u32>,
}

impl Config {
  /// Load from `config.toml` in the working directory and the process environment
  pub fn load() -> Self {
    let _ = dotenvy::dotenv();
    Self::from_sources(Path::new("config.toml"), |key| std::env::var(key).ok())
  }

  /// Same resolution as `load`, reading an explicit file and env lookup
  pub fn from_sources(path: &Path, env: impl Fn(&str) -> Option<String>) -> Self {
    let file = std::fs::read_to_string(path)
      .map(|contents| parse_file(&contents))
      .unwrap_or_default();
    Self::resolve(file, env)
  }

  fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
    let defaults = Self::default();

    let database_path = match file.database.and_then(|d| d.path) {
      Some(path) => {
        tracing::info!("Using database from config.toml: {}", path);
        PathBuf::from(path)
      }
      None => match env("DATABASE_PATH") {
        Some(path) => {
          tracing::info!("Using database from DATABASE_PATH env: {}", path);
          PathBuf::from(path)
        }
        None => {
          tracing::info!("Using default database path: {}", defaults.database_path.display());
          defaults.database_path
        }
      },
    };

    let (file_host, file_port) = match file.server {
      Some(s) => (s.host, s.port),
      None => (None, None),
    };
    let server_host = file_host
      .or_else(|| env("SERVER_HOST"))
      .unwrap_or(defaults.server_host);
    let server_port = file_port
      .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
      .unwrap_or(defaults.server_port);

    let (review_limit, new_card_limit) = match file.study {
      Some(s) => (s.review_limit, s.new_card_limit),
      None => (None, None),
    };

    Self {
      database_path,
      server_host,
      server_port,
      review_limit: review_limit.unwrap_or(defaults.review_limit),
      new_card_limit: new_card_limit.unwrap_or(defaults.new_card_limit),
      max_conflict_retries: file
        .review
        .and_then(|r| r.max_conflict_retries)
        .unwrap_or(defaults.max_conflict_retries),
    }
  }

  /// Full server bind address
  pub fn bind_addr(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_file(contents: &str) -> FileConfig {
  match toml::from_str::<FileConfig>(contents) {
    Ok(config) => config,
    Err(e) => {
      tracing::warn!("Ignoring malformed config.toml: {}", e);
      FileConfig::default()
    }
  }
}
