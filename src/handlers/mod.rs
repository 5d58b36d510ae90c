pub mod cards;
pub mod decks;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use cards::{get_card, submit_review};
pub use decks::{deck_stats, study_queue};

pub async fn health() -> &'static str {
  "ok"
}

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/cards/{card_id}", get(get_card))
    .route("/cards/{card_id}/reviews", post(submit_review))
    .route("/decks/{deck_id}/study", get(study_queue))
    .route("/decks/{deck_id}/stats", get(deck_stats))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
