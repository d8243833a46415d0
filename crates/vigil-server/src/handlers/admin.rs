//! Handlers for the admin surface.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/admin/deadline` | Record + admin status; 404 when absent |
//! | `POST`   | `/api/admin/deadline` | Create; appends a history snapshot |
//! | `PUT`    | `/api/admin/deadline` | Edit; preserves `createdAt` |
//! | `POST`   | `/api/admin/deadline/delete` | Phase 1: returns a confirm token |
//! | `POST`   | `/api/admin/deadline/delete/confirm` | Phase 2: body `{"token":…}` |
//! | `GET`    | `/api/admin/history` | Newest-first snapshots, `?limit=N` |
//! | `GET`    | `/api/admin/export` | Downloadable export file |
//! | `POST`   | `/api/admin/import` | Export file body; runs the edit save path |

use axum::{
  Json,
  extract::{Query, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vigil_core::{
  editor::{self, SaveMode},
  record::{AdminStatus, DeadlineDraft, DeadlineRecord, HistoryEntry},
  store::DeadlineStore,
};

use crate::{AppState, error::ApiError};

// ─── Current record ──────────────────────────────────────────────────────────

/// The admin view of the current record.
#[derive(Debug, Serialize)]
pub struct AdminDeadline {
  pub status: AdminStatus,
  pub record: DeadlineRecord,
}

/// `GET /api/admin/deadline`
pub async fn get_deadline<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<AdminDeadline>, ApiError>
where
  S: DeadlineStore + 'static,
{
  let record = state
    .store
    .get_current()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("no current deadline".to_string()))?;

  Ok(Json(AdminDeadline { status: record.admin_status(Utc::now()), record }))
}

// ─── Create / edit ───────────────────────────────────────────────────────────

/// `POST /api/admin/deadline` — returns 201 + the stored record.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(draft): Json<DeadlineDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DeadlineStore + 'static,
{
  let record =
    editor::save(state.store.as_ref(), draft, SaveMode::Create, Utc::now())
      .await
      .map_err(ApiError::from_save)?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /api/admin/deadline`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Json(draft): Json<DeadlineDraft>,
) -> Result<Json<DeadlineRecord>, ApiError>
where
  S: DeadlineStore + 'static,
{
  let record =
    editor::save(state.store.as_ref(), draft, SaveMode::Edit, Utc::now())
      .await
      .map_err(ApiError::from_save)?;
  Ok(Json(record))
}

// ─── Two-phase delete ────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteToken {
  pub token: Uuid,
}

/// `POST /api/admin/deadline/delete` — phase 1. Issues a fresh confirmation
/// token; any previously issued token is invalidated.
pub async fn delete_request<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<DeleteToken>, ApiError>
where
  S: DeadlineStore + 'static,
{
  let current = state
    .store
    .get_current()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if current.is_none() {
    return Err(ApiError::NotFound("no deadline to delete".to_string()));
  }

  let token = Uuid::new_v4();
  *state.pending_delete.lock().unwrap() = Some(token);
  Ok(Json(DeleteToken { token }))
}

/// `POST /api/admin/deadline/delete/confirm` — phase 2. The token is
/// single-use: it is consumed whether or not the delete succeeds.
pub async fn delete_confirm<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<DeleteToken>,
) -> Result<StatusCode, ApiError>
where
  S: DeadlineStore + 'static,
{
  let pending = state.pending_delete.lock().unwrap().take();
  if pending != Some(body.token) {
    return Err(ApiError::Conflict(
      "delete not requested or token mismatch".to_string(),
    ));
  }

  let existed = state
    .store
    .delete_current()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !existed {
    return Err(ApiError::NotFound("no deadline to delete".to_string()));
  }

  tracing::info!("current deadline deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── History ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub limit: Option<usize>,
}

/// `GET /api/admin/history[?limit=N]` — `limit` is capped by the configured
/// maximum.
pub async fn history<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError>
where
  S: DeadlineStore + 'static,
{
  let cap = state.config.history_limit;
  let limit = params.limit.unwrap_or(cap).min(cap);
  let entries = state
    .store
    .list_history(limit)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(entries))
}

// ─── Export / import ─────────────────────────────────────────────────────────

/// `GET /api/admin/export` — the current record as a downloadable file.
pub async fn export<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DeadlineStore + 'static,
{
  let record = state
    .store
    .get_current()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("no deadline to export".to_string()))?;

  let now = Utc::now();
  let body = vigil_export::serialize(&record, now)?;
  let disposition =
    format!("attachment; filename=\"{}\"", vigil_export::export_filename(now));

  Ok((
    [
      (header::CONTENT_TYPE, "application/json".to_string()),
      (header::CONTENT_DISPOSITION, disposition),
    ],
    body,
  ))
}

/// `POST /api/admin/import` — body is an export file. Parsing failures are
/// rejected before any write; an accepted payload runs the normal edit save
/// path, validation included.
pub async fn import<S>(
  State(state): State<AppState<S>>,
  body: String,
) -> Result<Json<DeadlineRecord>, ApiError>
where
  S: DeadlineStore + 'static,
{
  let file = vigil_export::parse(&body)?;
  let draft = DeadlineDraft::from(file.current_deadline);

  let record =
    editor::save(state.store.as_ref(), draft, SaveMode::Edit, Utc::now())
      .await
      .map_err(ApiError::from_save)?;

  tracing::info!(name = %record.display_name(), "deadline imported");
  Ok(Json(record))
}
