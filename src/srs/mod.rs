pub mod selection;
pub mod sm2;
pub mod stats;

pub use selection::{get_cards_for_review, get_new_cards};
pub use sm2::{compute_next_schedule, ScheduleUpdate};
pub use stats::{calculate_deck_stats, DeckStats};
