//! Handlers for the public countdown surface.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/deadline` | Current record, falling back to the default |
//! | `GET`  | `/api/deadline/events` | SSE stream of record changes |
//! | `GET`  | `/api/display` | Display state computed at request time |
//! | `GET`  | `/api/display/events` | SSE stream of engine ticks |
//!
//! This surface never errors: an empty or unreadable store yields the
//! deterministic fallback record so the page always has something to count.

use axum::{
  Json,
  extract::State,
  response::sse::{Event, KeepAlive, Sse},
};
use chrono::Utc;
use tokio_stream::{Stream, StreamExt as _, wrappers::WatchStream};
use vigil_core::{
  countdown::{DisplayState, compute_display_state},
  record::DeadlineRecord,
  store::DeadlineStore,
};

use crate::AppState;

/// Read the current record, substituting the fallback when the slot is empty
/// or unreadable.
pub(crate) async fn current_or_fallback<S: DeadlineStore>(store: &S) -> DeadlineRecord {
  match store.get_current().await {
    Ok(Some(record)) => record,
    Ok(None) => DeadlineRecord::fallback(Utc::now()),
    Err(e) => {
      tracing::warn!(error = %e, "store unreadable, serving fallback record");
      DeadlineRecord::fallback(Utc::now())
    }
  }
}

/// `GET /api/deadline`
pub async fn current<S>(State(state): State<AppState<S>>) -> Json<DeadlineRecord>
where
  S: DeadlineStore + 'static,
{
  Json(current_or_fallback(state.store.as_ref()).await)
}

/// `GET /api/display` — one frame, computed at request time.
pub async fn display<S>(State(state): State<AppState<S>>) -> Json<DisplayState>
where
  S: DeadlineStore + 'static,
{
  let record = current_or_fallback(state.store.as_ref()).await;
  Json(compute_display_state(Utc::now(), &record))
}

/// `GET /api/deadline/events` — pushes the record whenever a write lands,
/// starting with the value held at subscription time.
pub async fn record_events<S>(
  State(state): State<AppState<S>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>>
where
  S: DeadlineStore + 'static,
{
  let stream = WatchStream::new(state.store.watch()).map(|value| {
    let record = value.unwrap_or_else(|| DeadlineRecord::fallback(Utc::now()));
    Event::default().json_data(&record)
  });
  Sse::new(stream).keep_alive(KeepAlive::default())
}

/// `GET /api/display/events` — the engine's once-per-second frames; goes
/// quiet after expiry until the record is replaced.
pub async fn display_events<S>(
  State(state): State<AppState<S>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>>
where
  S: DeadlineStore + 'static,
{
  let stream = WatchStream::new(state.display.clone())
    .map(|frame| Event::default().json_data(&frame));
  Sse::new(stream).keep_alive(KeepAlive::default())
}
