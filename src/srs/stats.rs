//! Deck-level scheduling statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CardCategory, Schedulable};

use super::sm2::round_ease;

/// Repetition buckets (`new`, `learning`, `review`) partition the deck.
/// `due` is counted independently and overlaps them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
  pub total: usize,
  pub new: usize,
  pub learning: usize,
  pub review: usize,
  pub due: usize,
  /// 0 for an empty deck; real averages never drop below the 1.3 floor
  pub average_ease_factor: f64,
}

pub fn calculate_deck_stats<T: Schedulable>(cards: &[T], now: DateTime<Utc>) -> DeckStats {
  let mut stats = DeckStats {
    total: cards.len(),
    ..DeckStats::default()
  };

  let mut ease_sum = 0.0;
  for card in cards {
    match card.category() {
      CardCategory::New => stats.new += 1,
      CardCategory::Learning => stats.learning += 1,
      CardCategory::Review => stats.review += 1,
    }
    if card.is_due(now) {
      stats.due += 1;
    }
    ease_sum += card.ease_factor();
  }

  if stats.total > 0 {
    stats.average_ease_factor = round_ease(ease_sum / stats.total as f64);
  }

  stats
}
