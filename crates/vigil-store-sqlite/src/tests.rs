//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Duration, TimeZone, Utc};
use vigil_core::{record::DeadlineRecord, store::DeadlineStore};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn t0() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn record(name: &str, created_at: DateTime<Utc>) -> DeadlineRecord {
  DeadlineRecord {
    name:        name.to_string(),
    description: "desc".to_string(),
    start_date:  created_at,
    end_date:    created_at + Duration::days(7),
    is_active:   true,
    created_at:  Some(created_at),
    updated_at:  Some(created_at),
  }
}

// ─── Current slot ────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_store_has_no_current_record() {
  let s = store().await;
  assert!(s.get_current().await.unwrap().is_none());
}

#[tokio::test]
async fn put_and_get_roundtrip() {
  let s = store().await;
  let rec = record("Challenge", t0());

  s.put_current(&rec).await.unwrap();
  let fetched = s.get_current().await.unwrap().unwrap();
  assert_eq!(fetched, rec);
}

#[tokio::test]
async fn put_is_a_full_overwrite() {
  let s = store().await;
  s.put_current(&record("First", t0())).await.unwrap();

  let mut second = record("Second", t0() + Duration::hours(1));
  second.created_at = None;
  s.put_current(&second).await.unwrap();

  let fetched = s.get_current().await.unwrap().unwrap();
  assert_eq!(fetched.name, "Second");
  // Nothing merged from the previous document.
  assert_eq!(fetched.created_at, None);
}

#[tokio::test]
async fn delete_reports_whether_the_slot_was_occupied() {
  let s = store().await;
  assert!(!s.delete_current().await.unwrap());

  s.put_current(&record("Challenge", t0())).await.unwrap();
  assert!(s.delete_current().await.unwrap());
  assert!(s.get_current().await.unwrap().is_none());
}

// ─── History ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_never_touches_history() {
  let s = store().await;
  let rec = record("Challenge", t0());
  s.put_current(&rec).await.unwrap();
  s.append_history(&rec).await.unwrap();

  s.delete_current().await.unwrap();
  assert_eq!(s.list_history(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn history_lists_newest_first_with_limit() {
  let s = store().await;
  for i in 0..5 {
    let rec = record(&format!("Challenge {i}"), t0() + Duration::days(i));
    s.append_history(&rec).await.unwrap();
  }

  let entries = s.list_history(3).await.unwrap();
  assert_eq!(entries.len(), 3);
  assert_eq!(entries[0].record.name, "Challenge 4");
  assert_eq!(entries[1].record.name, "Challenge 3");
  assert_eq!(entries[2].record.name, "Challenge 2");
}

#[tokio::test]
async fn history_entry_without_created_at_still_orders() {
  let s = store().await;
  let mut rec = record("Undated", t0());
  rec.created_at = None;
  // The append time stands in as the ordering key.
  let entry = s.append_history(&rec).await.unwrap();
  assert!(entry.created_at > t0());

  let entries = s.list_history(10).await.unwrap();
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].entry_id, entry.entry_id);
}

// ─── Watch channel ───────────────────────────────────────────────────────────

#[tokio::test]
async fn watch_delivers_current_value_immediately() {
  let s = store().await;
  assert!(s.watch().borrow().is_none());

  s.put_current(&record("Challenge", t0())).await.unwrap();
  // A subscriber arriving after the write still sees it right away.
  let rx = s.watch();
  assert_eq!(rx.borrow().as_ref().unwrap().name, "Challenge");
}

#[tokio::test]
async fn watch_pushes_every_write_and_delete() {
  let s = store().await;
  let mut rx = s.watch();

  s.put_current(&record("Challenge", t0())).await.unwrap();
  rx.changed().await.unwrap();
  assert_eq!(
    rx.borrow_and_update().as_ref().unwrap().name,
    "Challenge"
  );

  s.delete_current().await.unwrap();
  rx.changed().await.unwrap();
  assert!(rx.borrow_and_update().is_none());
}

#[tokio::test]
async fn clones_share_one_watch_channel() {
  let s = store().await;
  let clone = s.clone();
  let mut rx = clone.watch();

  s.put_current(&record("Shared", t0())).await.unwrap();
  rx.changed().await.unwrap();
  assert_eq!(rx.borrow().as_ref().unwrap().name, "Shared");
}

#[tokio::test]
async fn reopened_file_store_seeds_watch_from_disk() {
  let dir = std::env::temp_dir().join(format!("vigil-store-{}", uuid::Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("deadlines.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.put_current(&record("Persisted", t0())).await.unwrap();
  }

  let reopened = SqliteStore::open(&path).await.unwrap();
  assert_eq!(
    reopened.watch().borrow().as_ref().unwrap().name,
    "Persisted"
  );

  std::fs::remove_dir_all(&dir).ok();
}
