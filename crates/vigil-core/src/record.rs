//! The deadline record — the single document everything else consumes.
//!
//! One live record occupies the fixed "current" slot of the store; immutable
//! snapshots of past records accumulate in the history list. Field names are
//! camelCase on the wire to match the original document shape.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name used when a record carries an empty `name`.
pub const UNNAMED: &str = "Unnamed Challenge";

// ─── Record ──────────────────────────────────────────────────────────────────

/// The deadline document. `end_date` is strictly after `start_date` for any
/// record produced by the editor; records read from elsewhere (imports, old
/// exports) are re-validated before being written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineRecord {
  pub name:        String,
  #[serde(default)]
  pub description: String,
  pub start_date:  DateTime<Utc>,
  pub end_date:    DateTime<Utc>,
  pub is_active:   bool,
  /// Stamped by the editor on creation only; absent on legacy payloads.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at:  Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at:  Option<DateTime<Utc>>,
}

impl DeadlineRecord {
  /// The deterministic default record used whenever the store has nothing
  /// usable: a seven-day window starting at `now`, active.
  pub fn fallback(now: DateTime<Utc>) -> Self {
    Self {
      name:        "Programming Challenge 2025".to_string(),
      description: "End-of-year programming challenge".to_string(),
      start_date:  now,
      end_date:    now + Duration::days(7),
      is_active:   true,
      created_at:  Some(now),
      updated_at:  Some(now),
    }
  }

  /// The name to render, substituting [`UNNAMED`] for an empty one.
  pub fn display_name(&self) -> &str {
    if self.name.trim().is_empty() { UNNAMED } else { &self.name }
  }

  /// Administrative status of the record as shown on the admin page.
  ///
  /// This is deliberately a different predicate from
  /// [`Urgency`](crate::countdown::Urgency): it consults the user-controlled
  /// `is_active` flag, which urgency never does.
  pub fn admin_status(&self, now: DateTime<Utc>) -> AdminStatus {
    if self.end_date <= now {
      AdminStatus::Expired
    } else if self.is_active {
      AdminStatus::Active
    } else {
      AdminStatus::Inactive
    }
  }
}

/// Status badge for the admin page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminStatus {
  Active,
  Inactive,
  Expired,
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// Candidate record accepted from form input. Timestamps are stamped by the
/// editor, never accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineDraft {
  pub name:        String,
  #[serde(default)]
  pub description: String,
  pub start_date:  DateTime<Utc>,
  pub end_date:    DateTime<Utc>,
  pub is_active:   bool,
}

impl From<DeadlineRecord> for DeadlineDraft {
  fn from(r: DeadlineRecord) -> Self {
    Self {
      name:        r.name,
      description: r.description,
      start_date:  r.start_date,
      end_date:    r.end_date,
      is_active:   r.is_active,
    }
  }
}

// ─── History ─────────────────────────────────────────────────────────────────

/// An immutable snapshot of a past record, appended at creation time only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub entry_id:   Uuid,
  /// Ordering key for newest-first listing; the snapshot's creation time.
  pub created_at: DateTime<Utc>,
  pub record:     DeadlineRecord,
}
