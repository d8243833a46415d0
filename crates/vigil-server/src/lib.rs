//! HTTP layer for Vigil.
//!
//! Exposes an axum [`Router`] over any [`DeadlineStore`]: a public surface
//! for the countdown page and an admin surface for editing, history, and
//! export/import. A single engine task (see [`engine`]) converts record
//! writes into a stream of display states shared by every subscriber.

pub mod engine;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{
  path::PathBuf,
  sync::{Arc, Mutex},
};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use uuid::Uuid;
use vigil_core::{countdown::DisplayState, store::DeadlineStore};

use handlers::{admin, public};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  #[serde(default = "default_store_path")]
  pub store_path:    PathBuf,
  /// Hard cap on the number of history entries a single request may list.
  #[serde(default = "default_history_limit")]
  pub history_limit: usize,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("vigil.db") }
fn default_history_limit() -> usize { 10 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          default_host(),
      port:          default_port(),
      store_path:    default_store_path(),
      history_limit: default_history_limit(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S: DeadlineStore> {
  pub store:          Arc<S>,
  pub config:         Arc<ServerConfig>,
  /// The engine's output; always holds the most recent display state.
  pub display:        watch::Receiver<DisplayState>,
  /// Token for the two-phase delete. Process-local: restarting the server
  /// voids any outstanding delete request.
  pub pending_delete: Arc<Mutex<Option<Uuid>>>,
}

// Manual impl: `S` itself need not be `Clone` behind the `Arc`.
impl<S: DeadlineStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:          Arc::clone(&self.store),
      config:         Arc::clone(&self.config),
      display:        self.display.clone(),
      pending_delete: Arc::clone(&self.pending_delete),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the countdown server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DeadlineStore + 'static,
{
  Router::new()
    // Public surface.
    .route("/api/deadline",        get(public::current::<S>))
    .route("/api/deadline/events", get(public::record_events::<S>))
    .route("/api/display",         get(public::display::<S>))
    .route("/api/display/events",  get(public::display_events::<S>))
    // Admin surface.
    .route(
      "/api/admin/deadline",
      get(admin::get_deadline::<S>)
        .post(admin::create::<S>)
        .put(admin::update::<S>),
    )
    .route("/api/admin/deadline/delete",         post(admin::delete_request::<S>))
    .route("/api/admin/deadline/delete/confirm", post(admin::delete_confirm::<S>))
    .route("/api/admin/history",                 get(admin::history::<S>))
    .route("/api/admin/export",                  get(admin::export::<S>))
    .route("/api/admin/import",                  post(admin::import::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
