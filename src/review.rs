//! Review submission and study-queue composition around the pure scheduler.
//!
//! A review is a read-compute-write of one card: the schedule update and the
//! review event commit in one transaction, and the schedule write is a
//! compare-and-swap on the card version so at most one update lands per
//! review event.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

use crate::db::{CardStore, ReviewLog};
use crate::domain::{Flashcard, ReviewEvent, ReviewQuality};
use crate::error::AppError;
use crate::srs::{self, sm2};

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSubmission {
  pub card_id: i64,
  pub user_id: i64,
  pub quality: ReviewQuality,
  pub response_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutcome {
  /// Card as persisted after the review
  pub card: Flashcard,
  pub event_id: i64,
}

/// Single read-compute-write pass.
///
/// Returns `Ok(None)` when the card version changed between the read and the
/// write; the caller is expected to roll back and try again.
pub fn apply_review<S>(
  store: &S,
  submission: &ReviewSubmission,
  now: DateTime<Utc>,
) -> Result<Option<ReviewOutcome>, AppError>
where
  S: CardStore + ReviewLog + ?Sized,
{
  let card = store
    .get_card(submission.card_id)?
    .ok_or_else(|| AppError::NotFound(format!("card {}", submission.card_id)))?;

  let update = sm2::compute_next_schedule(submission.quality.into(), &card.schedule, now);
  let schedule = update.into_state(now);

  if !store.update_schedule(card.id, card.version, &schedule)? {
    return Ok(None);
  }

  let event = ReviewEvent::new(
    card.id,
    submission.user_id,
    submission.quality,
    submission.response_ms,
    now,
  );
  let event_id = store.append_review(&event)?;

  tracing::debug!(
    "Card {} reviewed with quality {}: interval {}d, ease {:.2}, reps {}",
    card.id,
    submission.quality.value(),
    schedule.interval_days,
    schedule.ease_factor,
    schedule.repetitions
  );

  Ok(Some(ReviewOutcome {
    card: Flashcard {
      schedule,
      version: card.version + 1,
      ..card
    },
    event_id,
  }))
}

/// Record a review atomically, retrying lost compare-and-swaps.
pub fn record_review(
  conn: &mut Connection,
  submission: &ReviewSubmission,
  now: DateTime<Utc>,
  max_conflict_retries: u32,
) -> Result<ReviewOutcome, AppError> {
  let mut conflicts = 0;
  loop {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    match apply_review(&*tx, submission, now)? {
      Some(outcome) => {
        tx.commit()?;
        return Ok(outcome);
      }
      None => {
        tx.rollback()?;
        conflicts += 1;
        if conflicts > max_conflict_retries {
          tracing::warn!(
            "Giving up on card {} after {} conflicting schedule writes",
            submission.card_id,
            conflicts
          );
          return Err(AppError::Conflict(submission.card_id));
        }
        tracing::warn!("Schedule write for card {} conflicted, retrying", submission.card_id);
      }
    }
  }
}

/// Cards to study next: due reviews first, then never-reviewed cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudyQueue {
  pub due: Vec<Flashcard>,
  pub new: Vec<Flashcard>,
}

impl StudyQueue {
  pub fn len(&self) -> usize {
    self.due.len() + self.new.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Mix due cards with new cards, without listing any card twice.
pub fn build_study_queue(
  cards: &[Flashcard],
  review_limit: usize,
  new_card_limit: usize,
  now: DateTime<Utc>,
) -> StudyQueue {
  let due: Vec<Flashcard> = srs::get_cards_for_review(cards, review_limit, now)
    .into_iter()
    .cloned()
    .collect();

  let remaining: Vec<&Flashcard> = cards
    .iter()
    .filter(|card| !due.iter().any(|d| d.id == card.id))
    .collect();
  let new = srs::get_new_cards(&remaining, new_card_limit)
    .into_iter()
    .map(|card| (**card).clone())
    .collect();

  StudyQueue { due, new }
}
