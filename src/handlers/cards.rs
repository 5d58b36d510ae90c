use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::db;
use crate::domain::{Flashcard, ReviewQuality};
use crate::error::AppError;
use crate::review::{self, ReviewOutcome, ReviewSubmission};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
  pub user_id: i64,
  /// Raw JSON; fractional or string qualities are answered with 400
  pub quality: serde_json::Value,
  pub response_ms: Option<i64>,
}

/// Boundary check: quality must be an integer in 0-5.
pub fn parse_quality(value: &serde_json::Value) -> Result<ReviewQuality, AppError> {
  value
    .as_f64()
    .filter(|q| q.fract() == 0.0)
    .and_then(|q| if (0.0..=5.0).contains(&q) { ReviewQuality::from_u8(q as u8) } else { None })
    .ok_or_else(|| {
      AppError::Validation(format!("quality must be an integer from 0 to 5, got {}", value))
    })
}

/// GET /cards/{card_id}
pub async fn get_card(
  State(state): State<AppState>,
  Path(card_id): Path<i64>,
) -> Result<Json<Flashcard>, AppError> {
  let conn = db::try_lock(&state.db)?;
  db::get_card_by_id(&conn, card_id)?
    .map(Json)
    .ok_or_else(|| AppError::NotFound(format!("card {}", card_id)))
}

/// POST /cards/{card_id}/reviews
pub async fn submit_review(
  State(state): State<AppState>,
  Path(card_id): Path<i64>,
  payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewOutcome>, AppError> {
  let Json(request) = payload?;
  let quality = parse_quality(&request.quality)?;
  if request.response_ms.is_some_and(|ms| ms < 0) {
    return Err(AppError::Validation("response_ms must not be negative".to_string()));
  }

  let submission = ReviewSubmission {
    card_id,
    user_id: request.user_id,
    quality,
    response_ms: request.response_ms,
  };

  let mut conn = db::try_lock(&state.db)?;
  let outcome = review::record_review(
    &mut conn,
    &submission,
    Utc::now(),
    state.config.max_conflict_retries,
  )?;
  Ok(Json(outcome))
}
