//! Card CRUD and schedule persistence

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{CardScheduleState, Flashcard};

const CARD_COLUMNS: &str = "id, deck_id, front, back, ease_factor, interval_days, repetitions, \
                            next_review, last_review, version";

pub fn insert_card(conn: &Connection, card: &Flashcard) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO cards (deck_id, front, back, ease_factor, interval_days, repetitions,
                       next_review, last_review, version)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    "#,
    params![
      card.deck_id,
      card.front,
      card.back,
      card.schedule.ease_factor,
      card.schedule.interval_days,
      card.schedule.repetitions,
      card.schedule.next_review_date.to_rfc3339(),
      card.schedule.last_review_date.map(|dt| dt.to_rfc3339()),
      card.version,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_card_by_id(conn: &Connection, id: i64) -> Result<Option<Flashcard>> {
  conn
    .query_row(
      &format!("SELECT {} FROM cards WHERE id = ?1", CARD_COLUMNS),
      params![id],
      row_to_card,
    )
    .optional()
}

/// All cards in a deck, in insertion order
pub fn get_cards_by_deck(conn: &Connection, deck_id: i64) -> Result<Vec<Flashcard>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {} FROM cards WHERE deck_id = ?1 ORDER BY id ASC",
    CARD_COLUMNS
  ))?;

  let cards = stmt
    .query_map(params![deck_id], row_to_card)?
    .collect::<Result<Vec<_>>>()?;
  Ok(cards)
}

/// Compare-and-swap write of the scheduling fields.
///
/// Returns false when the stored version no longer matches `expected_version`
/// (another review committed first); nothing is written in that case.
pub fn update_card_schedule(
  conn: &Connection,
  id: i64,
  expected_version: i64,
  schedule: &CardScheduleState,
) -> Result<bool> {
  let updated = conn.execute(
    r#"
    UPDATE cards
    SET ease_factor = ?1, interval_days = ?2, repetitions = ?3, next_review = ?4,
        last_review = ?5, version = version + 1
    WHERE id = ?6 AND version = ?7
    "#,
    params![
      schedule.ease_factor,
      schedule.interval_days,
      schedule.repetitions,
      schedule.next_review_date.to_rfc3339(),
      schedule.last_review_date.map(|dt| dt.to_rfc3339()),
      id,
      expected_version,
    ],
  )?;
  Ok(updated == 1)
}

fn parse_timestamp(idx: usize, value: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(value)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

fn row_to_card(row: &rusqlite::Row) -> Result<Flashcard> {
  let next_review_str: String = row.get(7)?;
  let last_review_str: Option<String> = row.get(8)?;

  Ok(Flashcard {
    id: row.get(0)?,
    deck_id: row.get(1)?,
    front: row.get(2)?,
    back: row.get(3)?,
    schedule: CardScheduleState {
      ease_factor: row.get(4)?,
      interval_days: row.get(5)?,
      repetitions: row.get(6)?,
      next_review_date: parse_timestamp(7, &next_review_str)?,
      last_review_date: last_review_str
        .as_deref()
        .map(|s| parse_timestamp(8, s))
        .transpose()?,
    },
    version: row.get(9)?,
  })
}
