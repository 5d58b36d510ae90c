//! Append-only review event log

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::ReviewEvent;

pub fn insert_review_event(conn: &Connection, event: &ReviewEvent) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO review_events (flashcard_id, user_id, quality, response_ms, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
    params![
      event.flashcard_id,
      event.user_id,
      event.quality,
      event.response_ms,
      event.created_at.to_rfc3339(),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Review history for a card, oldest first
pub fn get_review_events(conn: &Connection, flashcard_id: i64) -> Result<Vec<ReviewEvent>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, flashcard_id, user_id, quality, response_ms, created_at
    FROM review_events
    WHERE flashcard_id = ?1
    ORDER BY created_at ASC, id ASC
    "#,
  )?;

  let events = stmt
    .query_map(params![flashcard_id], |row| {
      let created_at_str: String = row.get(5)?;
      Ok(ReviewEvent {
        id: row.get(0)?,
        flashcard_id: row.get(1)?,
        user_id: row.get(2)?,
        quality: row.get(3)?,
        response_ms: row.get(4)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
          .map(|dt| dt.with_timezone(&Utc))
          .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
          })?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;

  Ok(events)
}
