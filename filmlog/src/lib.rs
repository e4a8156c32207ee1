//! filmlog - personal movie-collection tracker behind a chat interface
//!
//! The conversation engine drives add / inspect / edit / remove flows over a
//! per-user SQLite record store, optionally enriched by TMDB metadata
//! lookup. The HTTP layer is a thin chat gateway in front of the engine.

pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod format;
pub mod models;
pub mod services;
pub mod similarity;
pub mod validate;

pub use crate::error::{Error, Result};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::engine::ConversationEngine;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Conversation engine with its session store
    pub engine: Arc<ConversationEngine>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: ConversationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::chat_routes())
        .merge(api::health_routes())
        .with_state(state)
}
