pub mod card;
pub mod review;

pub use card::{
  CardCategory, CardScheduleState, Flashcard, Schedulable, INITIAL_EASE_FACTOR, MAX_INTERVAL_DAYS,
  MIN_EASE_FACTOR,
};
pub use review::{ReviewEvent, ReviewQuality};
