//! [`SqliteStore`] — the SQLite implementation of [`DeadlineStore`].

use std::{path::Path, sync::Arc};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tokio::sync::watch;
use uuid::Uuid;

use vigil_core::{
  record::{DeadlineRecord, HistoryEntry},
  store::DeadlineStore,
};

use crate::{
  Error, Result,
  encode::{RawHistoryEntry, decode_record, encode_dt, encode_record, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A deadline store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, and all
/// clones share one watch channel so every subscriber sees every write.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  records: Arc<watch::Sender<Option<DeadlineRecord>>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;

    let store = Self {
      conn,
      records: Arc::new(watch::channel(None).0),
    };

    // Seed the channel with whatever the slot holds so the first subscriber
    // sees the current value immediately. An unreadable slot seeds `None`;
    // readers fall back to the default record.
    let initial = store.read_current().await.unwrap_or(None);
    let _ = store.records.send(initial);

    Ok(store)
  }

  async fn read_current(&self) -> Result<Option<DeadlineRecord>> {
    let json: Option<String> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT record_json FROM current WHERE slot = 'current'",
              [],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    json.as_deref().map(decode_record).transpose()
  }
}

// ─── DeadlineStore impl ──────────────────────────────────────────────────────

impl DeadlineStore for SqliteStore {
  type Error = Error;

  async fn get_current(&self) -> Result<Option<DeadlineRecord>> {
    self.read_current().await
  }

  async fn put_current(&self, record: &DeadlineRecord) -> Result<()> {
    let record_json = encode_record(record)?;
    let updated_at = encode_dt(record.updated_at.unwrap_or_else(Utc::now));

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO current (slot, record_json, updated_at)
           VALUES ('current', ?1, ?2)
           ON CONFLICT (slot) DO UPDATE SET
             record_json = excluded.record_json,
             updated_at  = excluded.updated_at",
          rusqlite::params![record_json, updated_at],
        )?;
        Ok(())
      })
      .await?;

    // Notify only after the write landed; subscribers never observe a value
    // the database does not hold.
    let _ = self.records.send(Some(record.clone()));
    Ok(())
  }

  async fn delete_current(&self) -> Result<bool> {
    let changed = self
      .conn
      .call(|conn| {
        Ok(conn.execute("DELETE FROM current WHERE slot = 'current'", [])?)
      })
      .await?;

    let existed = changed > 0;
    if existed {
      let _ = self.records.send(None);
    }
    Ok(existed)
  }

  async fn append_history(&self, record: &DeadlineRecord) -> Result<HistoryEntry> {
    let entry = HistoryEntry {
      entry_id:   Uuid::new_v4(),
      created_at: record.created_at.unwrap_or_else(Utc::now),
      record:     record.clone(),
    };

    let id_str = encode_uuid(entry.entry_id);
    let at_str = encode_dt(entry.created_at);
    let record_json = encode_record(&entry.record)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO history (entry_id, created_at, record_json)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, at_str, record_json],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
    let limit_val = limit as i64;

    let raws: Vec<RawHistoryEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT entry_id, created_at, record_json
           FROM history
           ORDER BY created_at DESC, entry_id
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], |row| {
            Ok(RawHistoryEntry {
              entry_id:    row.get(0)?,
              created_at:  row.get(1)?,
              record_json: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistoryEntry::into_entry).collect()
  }

  fn watch(&self) -> watch::Receiver<Option<DeadlineRecord>> {
    self.records.subscribe()
  }
}
