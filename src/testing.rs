//! Test utilities for database setup.
//!
//! Reuses the production `init_db` path so tests run against the real schema.

use rusqlite::Connection;
use std::path::Path;
use std::sync::MutexGuard;
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{self, DbPool};
use crate::state::AppState;

/// Throwaway database in a temporary directory, removed on drop.
pub struct TestEnv {
  /// Kept alive so the database file outlives the connection
  pub temp: TempDir,
  pub pool: DbPool,
}

impl TestEnv {
  pub fn new() -> rusqlite::Result<Self> {
    let temp =
      TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let pool = db::init_db(&temp.path().join("flashdeck.db"))?;
    Ok(Self { temp, pool })
  }

  pub fn conn(&self) -> MutexGuard<'_, Connection> {
    self.pool.lock().unwrap()
  }

  /// Handler state sharing this environment's connection
  pub fn app_state(&self) -> AppState {
    let config = Config {
      database_path: self.db_path(),
      ..Config::default()
    };
    AppState::new(self.pool.clone(), config)
  }

  pub fn db_path(&self) -> std::path::PathBuf {
    self.path().join("flashdeck.db")
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }
}
