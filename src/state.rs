//! Shared handler state.

use std::sync::Arc;

use crate::config::Config;
use crate::db::DbPool;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
  pub db: DbPool,
  pub config: Arc<Config>,
}

impl AppState {
  pub fn new(db: DbPool, config: Config) -> Self {
    Self {
      db,
      config: Arc::new(config),
    }
  }
}
