//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, the record as its JSON document
//! form, and UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vigil_core::record::{DeadlineRecord, HistoryEntry};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Record document ─────────────────────────────────────────────────────────

pub fn encode_record(record: &DeadlineRecord) -> Result<String> {
  Ok(serde_json::to_string(record)?)
}

pub fn decode_record(s: &str) -> Result<DeadlineRecord> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `history` row.
pub struct RawHistoryEntry {
  pub entry_id:    String,
  pub created_at:  String,
  pub record_json: String,
}

impl RawHistoryEntry {
  pub fn into_entry(self) -> Result<HistoryEntry> {
    Ok(HistoryEntry {
      entry_id:   decode_uuid(&self.entry_id)?,
      created_at: decode_dt(&self.created_at)?,
      record:     decode_record(&self.record_json)?,
    })
  }
}
