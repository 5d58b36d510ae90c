use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ease factor assigned to a freshly created card
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Hard floor for the SM-2 ease factor
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Repetition count at which a card leaves the learning bucket
pub const MATURE_REPETITIONS: u32 = 3;

/// Longest gap the scheduler will put between two reviews (about 100 years)
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Read access to the scheduling fields used by selection and deck stats.
///
/// Implemented for both the bare schedule and the full card record so the
/// query helpers work on whatever the caller already has in hand.
pub trait Schedulable {
  fn next_review_date(&self) -> DateTime<Utc>;
  fn repetitions(&self) -> u32;
  fn ease_factor(&self) -> f64;

  fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_review_date() <= now
  }

  /// Never successfully reviewed, regardless of review date
  fn is_new(&self) -> bool {
    self.repetitions() == 0
  }

  fn category(&self) -> CardCategory {
    CardCategory::from_repetitions(self.repetitions())
  }
}

impl<T: Schedulable + ?Sized> Schedulable for &T {
  fn next_review_date(&self) -> DateTime<Utc> {
    (**self).next_review_date()
  }

  fn repetitions(&self) -> u32 {
    (**self).repetitions()
  }

  fn ease_factor(&self) -> f64 {
    (**self).ease_factor()
  }
}

/// Derived bucket a card falls into based on its repetition count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
  New,
  Learning,
  Review,
}

impl CardCategory {
  pub fn from_repetitions(repetitions: u32) -> Self {
    match repetitions {
      0 => Self::New,
      r if r < MATURE_REPETITIONS => Self::Learning,
      _ => Self::Review,
    }
  }
}

/// The subset of a flashcard that the SM-2 scheduler reads and writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardScheduleState {
  pub ease_factor: f64,
  pub interval_days: u32,
  pub repetitions: u32,
  pub next_review_date: DateTime<Utc>,
  /// None until the first review lands
  pub last_review_date: Option<DateTime<Utc>>,
}

impl CardScheduleState {
  /// Unseen state: default ease, no interval, due as soon as it exists.
  pub fn new(created_at: DateTime<Utc>) -> Self {
    Self {
      ease_factor: INITIAL_EASE_FACTOR,
      interval_days: 0,
      repetitions: 0,
      next_review_date: created_at,
      last_review_date: None,
    }
  }
}

impl Schedulable for CardScheduleState {
  fn next_review_date(&self) -> DateTime<Utc> {
    self.next_review_date
  }

  fn repetitions(&self) -> u32 {
    self.repetitions
  }

  fn ease_factor(&self) -> f64 {
    self.ease_factor
  }
}

/// Persisted flashcard record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
  pub id: i64,
  pub deck_id: i64,
  pub front: String,
  pub back: String,
  pub schedule: CardScheduleState,
  /// Bumped on every schedule write; compared before the next one
  pub version: i64,
}

impl Flashcard {
  pub fn new(deck_id: i64, front: String, back: String, created_at: DateTime<Utc>) -> Self {
    Self {
      id: 0,
      deck_id,
      front,
      back,
      schedule: CardScheduleState::new(created_at),
      version: 0,
    }
  }
}

impl Schedulable for Flashcard {
  fn next_review_date(&self) -> DateTime<Utc> {
    self.schedule.next_review_date
  }

  fn repetitions(&self) -> u32 {
    self.schedule.repetitions
  }

  fn ease_factor(&self) -> f64 {
    self.schedule.ease_factor
  }
}
