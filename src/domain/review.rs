use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Self-rated recall quality on the SM-2 0-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReviewQuality {
  Blackout = 0,
  Incorrect = 1,
  IncorrectFamiliar = 2,
  Hard = 3,
  Good = 4,
  Perfect = 5,
}

impl ReviewQuality {
  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      0 => Some(Self::Blackout),
      1 => Some(Self::Incorrect),
      2 => Some(Self::IncorrectFamiliar),
      3 => Some(Self::Hard),
      4 => Some(Self::Good),
      5 => Some(Self::Perfect),
      _ => None,
    }
  }

  /// Round to the nearest integer, then clamp into 0-5. NaN maps to Blackout.
  pub fn clamped(raw: f64) -> Self {
    if raw.is_nan() {
      return Self::Blackout;
    }
    let q = raw.round().clamp(0.0, 5.0) as u8;
    Self::from_u8(q).unwrap_or(Self::Blackout)
  }

  pub fn value(&self) -> u8 {
    *self as u8
  }

  /// Quality 3 and above counts as a successful recall
  pub fn is_correct(&self) -> bool {
    *self >= Self::Hard
  }
}

impl From<ReviewQuality> for f64 {
  fn from(quality: ReviewQuality) -> Self {
    f64::from(quality.value())
  }
}

/// Append-only record of a single review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEvent {
  pub id: i64,
  pub flashcard_id: i64,
  pub user_id: i64,
  pub quality: u8,
  pub response_ms: Option<i64>,
  pub created_at: DateTime<Utc>,
}

impl ReviewEvent {
  pub fn new(
    flashcard_id: i64,
    user_id: i64,
    quality: ReviewQuality,
    response_ms: Option<i64>,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: 0,
      flashcard_id,
      user_id,
      quality: quality.value(),
      response_ms,
      created_at,
    }
  }
}
