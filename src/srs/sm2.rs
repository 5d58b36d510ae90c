use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CardScheduleState, ReviewQuality, MAX_INTERVAL_DAYS, MIN_EASE_FACTOR};

/// Fields produced by one SM-2 step.
///
/// Carries no `last_review_date`; the caller sets it when persisting, see
/// [`ScheduleUpdate::into_state`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleUpdate {
  pub ease_factor: f64,
  pub interval_days: u32,
  pub repetitions: u32,
  pub next_review_date: DateTime<Utc>,
}

impl ScheduleUpdate {
  /// Full schedule state to persist once the review at `reviewed_at` is committed
  pub fn into_state(self, reviewed_at: DateTime<Utc>) -> CardScheduleState {
    CardScheduleState {
      ease_factor: self.ease_factor,
      interval_days: self.interval_days,
      repetitions: self.repetitions,
      next_review_date: self.next_review_date,
      last_review_date: Some(reviewed_at),
    }
  }
}

/// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
pub fn ease_delta(quality: ReviewQuality) -> f64 {
  let miss = 5.0 - f64::from(quality);
  0.1 - miss * (0.08 + miss * 0.02)
}

/// Persisted ease factors carry two decimal places
pub fn round_ease(ease_factor: f64) -> f64 {
  (ease_factor * 100.0).round() / 100.0
}

/// Compute the next SM-2 schedule for a card.
///
/// `quality` is rounded and clamped into 0-5 rather than rejected, so this
/// never fails. `now` is used once for the next review date.
pub fn compute_next_schedule(
  quality: f64,
  current: &CardScheduleState,
  now: DateTime<Utc>,
) -> ScheduleUpdate {
  let quality = ReviewQuality::clamped(quality);

  let (interval_days, repetitions) = if quality.is_correct() {
    let interval = match current.repetitions {
      0 => 1,
      1 => 6,
      // A card with reps >= 2 never sits at interval 0; max(1) keeps a corrupt row moving
      _ => ((f64::from(current.interval_days) * current.ease_factor).round() as u32).max(1),
    };
    let interval = interval.min(MAX_INTERVAL_DAYS);
    (interval, current.repetitions.saturating_add(1))
  } else {
    (1, 0)
  };

  let ease_factor = round_ease((current.ease_factor + ease_delta(quality)).max(MIN_EASE_FACTOR));

  ScheduleUpdate {
    ease_factor,
    interval_days,
    repetitions,
    next_review_date: review_date_after(now, interval_days),
  }
}

/// `now` plus `interval_days`, saturating at the latest representable instant
fn review_date_after(now: DateTime<Utc>, interval_days: u32) -> DateTime<Utc> {
  Duration::try_days(i64::from(interval_days))
    .and_then(|interval| now.checked_add_signed(interval))
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::INITIAL_EASE_FACTOR;
  use chrono::TimeZone;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
  }

  fn state(ease_factor: f64, interval_days: u32, repetitions: u32) -> CardScheduleState {
    CardScheduleState {
      ease_factor,
      interval_days,
      repetitions,
      next_review_date: now(),
      last_review_date: None,
    }
  }

  #[test]
  fn test_first_review_good() {
    let result = compute_next_schedule(4.0, &state(2.5, 0, 0), now());
    assert_eq!(result.repetitions, 1);
    assert_eq!(result.interval_days, 1);
    assert!((result.ease_factor - 2.5).abs() < 0.001);
    assert_eq!(result.next_review_date, now() + Duration::days(1));
  }

  #[test]
  fn test_second_review_good() {
    let result = compute_next_schedule(4.0, &state(2.5, 1, 1), now());
    assert_eq!(result.repetitions, 2);
    assert_eq!(result.interval_days, 6);
    assert_eq!(result.next_review_date, now() + Duration::days(6));
  }

  #[test]
  fn test_third_review_uses_current_ease() {
    let result = compute_next_schedule(4.0, &state(2.5, 6, 2), now());
    assert_eq!(result.repetitions, 3);
    // round(6 * 2.5) = 15
    assert_eq!(result.interval_days, 15);
  }

  #[test]
  fn test_interval_uses_ease_before_update() {
    // Quality 3 lowers EF to 2.36, but the interval still multiplies by 2.5
    let result = compute_next_schedule(3.0, &state(2.5, 10, 4), now());
    assert_eq!(result.interval_days, 25);
    assert!((result.ease_factor - 2.36).abs() < 0.001);
  }

  #[test]
  fn test_failed_review_resets() {
    let result = compute_next_schedule(0.0, &state(2.5, 15, 5), now());
    assert_eq!(result.repetitions, 0);
    assert_eq!(result.interval_days, 1);
    assert!(result.ease_factor < 2.5);
    assert_eq!(result.next_review_date, now() + Duration::days(1));
  }

  #[test]
  fn test_quality_two_is_a_failure() {
    let result = compute_next_schedule(2.0, &state(2.5, 6, 2), now());
    assert_eq!(result.repetitions, 0);
    assert_eq!(result.interval_days, 1);
  }

  #[test]
  fn test_quality_three_is_a_success() {
    let result = compute_next_schedule(3.0, &state(2.5, 1, 1), now());
    assert_eq!(result.repetitions, 2);
    assert_eq!(result.interval_days, 6);
  }

  #[test]
  fn test_quality_clamped_high() {
    let s = state(2.2, 9, 3);
    assert_eq!(compute_next_schedule(7.0, &s, now()), compute_next_schedule(5.0, &s, now()));
  }

  #[test]
  fn test_quality_clamped_low() {
    let s = state(2.2, 9, 3);
    assert_eq!(compute_next_schedule(-3.0, &s, now()), compute_next_schedule(0.0, &s, now()));
  }

  #[test]
  fn test_quality_rounded_before_branching() {
    let s = state(2.5, 6, 2);
    assert_eq!(compute_next_schedule(2.6, &s, now()), compute_next_schedule(3.0, &s, now()));
    assert_eq!(compute_next_schedule(2.4, &s, now()), compute_next_schedule(2.0, &s, now()));
  }

  #[test]
  fn test_ease_delta_monotonic_in_quality() {
    let deltas: Vec<f64> = (0..=5)
      .map(|q| ease_delta(ReviewQuality::from_u8(q).unwrap()))
      .collect();
    for pair in deltas.windows(2) {
      assert!(pair[1] > pair[0]);
    }
  }

  #[test]
  fn test_perfect_grows_ease_more_than_hard() {
    let s = state(2.0, 6, 2);
    let perfect = compute_next_schedule(5.0, &s, now());
    let hard = compute_next_schedule(3.0, &s, now());
    assert!(perfect.ease_factor - s.ease_factor > hard.ease_factor - s.ease_factor);
  }

  #[test]
  fn test_ease_factor_floor() {
    let mut current = state(2.5, 10, 5);

    for _ in 0..10 {
      current = compute_next_schedule(0.0, &current, now()).into_state(now());
      assert!(current.ease_factor >= MIN_EASE_FACTOR);
    }

    assert!((current.ease_factor - MIN_EASE_FACTOR).abs() < f64::EPSILON);
  }

  #[test]
  fn test_ease_floor_holds_for_every_quality() {
    for q in 0..=5 {
      let result = compute_next_schedule(f64::from(q), &state(MIN_EASE_FACTOR, 4, 3), now());
      assert!(result.ease_factor >= MIN_EASE_FACTOR, "quality {} went below the floor", q);
    }
  }

  #[test]
  fn test_ease_rounded_to_two_places() {
    let result = compute_next_schedule(3.0, &state(2.345, 1, 1), now());
    // 2.345 - 0.14 = 2.205
    assert!(((result.ease_factor * 100.0) - (result.ease_factor * 100.0).round()).abs() < 1e-9);
  }

  #[test]
  fn test_into_state_sets_last_review() {
    let result = compute_next_schedule(4.0, &state(2.5, 0, 0), now());
    let next = result.clone().into_state(now());
    assert_eq!(next.last_review_date, Some(now()));
    assert_eq!(next.next_review_date, result.next_review_date);
    assert_eq!(next.interval_days, result.interval_days);
  }

  #[test]
  fn test_end_to_end_scenario() {
    let start = CardScheduleState::new(now());
    assert!((start.ease_factor - INITIAL_EASE_FACTOR).abs() < f64::EPSILON);

    let day1 = compute_next_schedule(5.0, &start, now());
    assert_eq!(day1.interval_days, 1);
    assert_eq!(day1.repetitions, 1);
    assert_eq!(day1.ease_factor, 2.6);

    let later = now() + Duration::days(1);
    let day2 = compute_next_schedule(5.0, &day1.into_state(now()), later);
    assert_eq!(day2.interval_days, 6);
    assert_eq!(day2.repetitions, 2);
    assert_eq!(day2.ease_factor, 2.7);

    let lapse_at = later + Duration::days(6);
    let lapse = compute_next_schedule(2.0, &day2.into_state(later), lapse_at);
    assert_eq!(lapse.interval_days, 1);
    assert_eq!(lapse.repetitions, 0);
    assert!(lapse.ease_factor < 2.7);
    assert!(lapse.ease_factor >= MIN_EASE_FACTOR);
    assert_eq!(lapse.ease_factor, 2.38);
    assert_eq!(lapse.next_review_date, lapse_at + Duration::days(1));
  }

  #[test]
  fn test_interval_capped() {
    let result = compute_next_schedule(5.0, &state(2.5, 50_000_000, 5), now());
    assert_eq!(result.interval_days, MAX_INTERVAL_DAYS);
    assert_eq!(result.next_review_date, now() + Duration::days(i64::from(MAX_INTERVAL_DAYS)));
  }

  #[test]
  fn test_long_perfect_streak_stays_bounded() {
    let mut current = CardScheduleState::new(now());
    let mut reviewed_at = now();

    for _ in 0..40 {
      let next = compute_next_schedule(5.0, &current, reviewed_at);
      assert!(next.interval_days <= MAX_INTERVAL_DAYS);
      assert!(next.next_review_date > reviewed_at);
      current = next.into_state(reviewed_at);
      reviewed_at = current.next_review_date;
    }

    assert_eq!(current.interval_days, MAX_INTERVAL_DAYS);
  }

  #[test]
  fn test_review_date_saturates() {
    let late = DateTime::<Utc>::MAX_UTC - Duration::days(2);
    assert_eq!(review_date_after(late, 10), DateTime::<Utc>::MAX_UTC);
    assert_eq!(review_date_after(now(), 1), now() + Duration::days(1));
  }

  #[test]
  fn test_interval_grows_exponentially() {
    let mut current = CardScheduleState::new(now());

    for i in 0..5 {
      current = compute_next_schedule(4.0, &current, now()).into_state(now());
      match i {
        0 => assert_eq!(current.interval_days, 1),
        1 => assert_eq!(current.interval_days, 6),
        _ => assert!(current.interval_days > 6),
      }
    }

    assert!(current.interval_days > 30);
  }
}
