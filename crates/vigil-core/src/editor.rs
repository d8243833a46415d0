//! The admin record editor — validation and the save/delete write paths.
//!
//! The editor is the only writer that stamps timestamps. It validates
//! before touching the store; a rejected draft issues no write at all.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
  Error,
  record::{DeadlineDraft, DeadlineRecord},
  store::DeadlineStore,
};

/// Whether a save creates a fresh record or edits the existing one. Only a
/// create appends a history snapshot and stamps `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
  Create,
  Edit,
}

/// An error from the save path: either the draft was rejected locally or
/// the backend refused the write.
#[derive(Debug, Error)]
pub enum SaveError<E: std::error::Error> {
  #[error(transparent)]
  Invalid(#[from] Error),

  #[error("store error: {0}")]
  Store(E),
}

/// Check a draft without writing anything.
pub fn validate(draft: &DeadlineDraft) -> Result<(), Error> {
  if draft.name.trim().is_empty() {
    return Err(Error::EmptyName);
  }
  if draft.end_date <= draft.start_date {
    return Err(Error::EndNotAfterStart {
      start: draft.start_date,
      end:   draft.end_date,
    });
  }
  Ok(())
}

/// Validate `draft` and write it as the current record.
///
/// - `updated_at` is always stamped with `now`.
/// - `created_at` is stamped only on [`SaveMode::Create`]; an edit keeps the
///   stored record's `created_at` (or falls back to `now` when the slot was
///   empty, e.g. an import over a fresh store).
/// - A create also appends an immutable snapshot to history; an edit never
///   does.
pub async fn save<S: DeadlineStore>(
  store: &S,
  draft: DeadlineDraft,
  mode: SaveMode,
  now: DateTime<Utc>,
) -> Result<DeadlineRecord, SaveError<S::Error>> {
  validate(&draft)?;

  let created_at = match mode {
    SaveMode::Create => Some(now),
    SaveMode::Edit => store
      .get_current()
      .await
      .map_err(SaveError::Store)?
      .and_then(|existing| existing.created_at)
      .or(Some(now)),
  };

  let record = DeadlineRecord {
    name:        draft.name.trim().to_string(),
    description: draft.description.trim().to_string(),
    start_date:  draft.start_date,
    end_date:    draft.end_date,
    is_active:   draft.is_active,
    created_at,
    updated_at:  Some(now),
  };

  store.put_current(&record).await.map_err(SaveError::Store)?;

  if mode == SaveMode::Create {
    store
      .append_history(&record)
      .await
      .map_err(SaveError::Store)?;
  }

  Ok(record)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
