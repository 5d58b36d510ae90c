//! Due-card and new-card selection over an already-fetched candidate set.

use chrono::{DateTime, Utc};

use crate::domain::Schedulable;

/// Cards whose next review date has passed, most overdue first.
///
/// The sort is stable, so cards sharing a review date keep their input order.
pub fn get_cards_for_review<T: Schedulable>(cards: &[T], limit: usize, now: DateTime<Utc>) -> Vec<&T> {
  if limit == 0 {
    return Vec::new();
  }

  let mut due: Vec<&T> = cards.iter().filter(|card| card.is_due(now)).collect();
  due.sort_by_key(|card| card.next_review_date());
  due.truncate(limit);
  due
}

/// Cards that have never been successfully reviewed, in input order.
///
/// Review dates are ignored: a new card may also be due, or not yet due.
pub fn get_new_cards<T: Schedulable>(cards: &[T], limit: usize) -> Vec<&T> {
  cards
    .iter()
    .filter(|card| card.is_new())
    .take(limit)
    .collect()
}
