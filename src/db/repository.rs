//! Collaborator interfaces the review flow is written against.
//!
//! `rusqlite::Connection` implements both, and so does a `Transaction`
//! through deref, which is how a review commits its two writes together.

use rusqlite::{Connection, Result};

use crate::domain::{CardScheduleState, Flashcard, ReviewEvent};

use super::{cards, reviews};

pub trait CardStore {
  fn get_card(&self, card_id: i64) -> Result<Option<Flashcard>>;

  fn get_deck_cards(&self, deck_id: i64) -> Result<Vec<Flashcard>>;

  /// Writes only if the stored version still equals `expected_version`
  fn update_schedule(
    &self,
    card_id: i64,
    expected_version: i64,
    schedule: &CardScheduleState,
  ) -> Result<bool>;
}

pub trait ReviewLog {
  fn append_review(&self, event: &ReviewEvent) -> Result<i64>;
}

impl CardStore for Connection {
  fn get_card(&self, card_id: i64) -> Result<Option<Flashcard>> {
    cards::get_card_by_id(self, card_id)
  }

  fn get_deck_cards(&self, deck_id: i64) -> Result<Vec<Flashcard>> {
    cards::get_cards_by_deck(self, deck_id)
  }

  fn update_schedule(
    &self,
    card_id: i64,
    expected_version: i64,
    schedule: &CardScheduleState,
  ) -> Result<bool> {
    cards::update_card_schedule(self, card_id, expected_version, schedule)
  }
}

impl ReviewLog for Connection {
  fn append_review(&self, event: &ReviewEvent) -> Result<i64> {
    reviews::insert_review_event(self, event)
  }
}
