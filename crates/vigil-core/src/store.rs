//! The `DeadlineStore` trait.
//!
//! Implemented by storage backends (e.g. `vigil-store-sqlite`). Higher
//! layers (`vigil-server`, the editor) depend on this abstraction, not on
//! any concrete backend.
//!
//! There is exactly one live record — the "current" slot — so the trait
//! addresses it directly instead of taking a key. History is append-only
//! and unbounded; only its listing is capped.

use std::future::Future;

use tokio::sync::watch;

use crate::record::{DeadlineRecord, HistoryEntry};

/// Abstraction over a deadline store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DeadlineStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the current record. `None` if the slot is empty.
  fn get_current(
    &self,
  ) -> impl Future<Output = Result<Option<DeadlineRecord>, Self::Error>> + Send + '_;

  /// Write the current record — a full overwrite, never a merge.
  fn put_current<'a>(
    &'a self,
    record: &'a DeadlineRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove the current record. Returns `false` if the slot was already
  /// empty. History entries are never removed.
  fn delete_current(
    &self,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Append an immutable snapshot to the history list.
  fn append_history<'a>(
    &'a self,
    record: &'a DeadlineRecord,
  ) -> impl Future<Output = Result<HistoryEntry, Self::Error>> + Send + 'a;

  /// List history snapshots, newest first, at most `limit` entries.
  fn list_history(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<HistoryEntry>, Self::Error>> + Send + '_;

  /// Subscribe to current-record changes.
  ///
  /// The receiver holds the value as of subscription time and is updated
  /// after every successful `put_current`/`delete_current` — the whole
  /// record is replaced in one step, never mutated in place.
  fn watch(&self) -> watch::Receiver<Option<DeadlineRecord>>;
}
