use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::db::{self, CardStore};
use crate::error::AppError;
use crate::review::{self, StudyQueue};
use crate::srs::{self, DeckStats};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StudyParams {
  pub limit: Option<usize>,
  pub new_limit: Option<usize>,
}

/// GET /decks/{deck_id}/study
pub async fn study_queue(
  State(state): State<AppState>,
  Path(deck_id): Path<i64>,
  Query(params): Query<StudyParams>,
) -> Result<Json<StudyQueue>, AppError> {
  let cards = {
    let conn = db::try_lock(&state.db)?;
    conn.get_deck_cards(deck_id)?
  };

  let queue = review::build_study_queue(
    &cards,
    params.limit.unwrap_or(state.config.review_limit),
    params.new_limit.unwrap_or(state.config.new_card_limit),
    Utc::now(),
  );
  tracing::debug!(
    "Deck {} study queue: {} due, {} new of {} cards",
    deck_id,
    queue.due.len(),
    queue.new.len(),
    cards.len()
  );
  Ok(Json(queue))
}

/// GET /decks/{deck_id}/stats
pub async fn deck_stats(
  State(state): State<AppState>,
  Path(deck_id): Path<i64>,
) -> Result<Json<DeckStats>, AppError> {
  let cards = {
    let conn = db::try_lock(&state.db)?;
    conn.get_deck_cards(deck_id)?
  };
  Ok(Json(srs::calculate_deck_stats(&cards, Utc::now())))
}
