//! Chat message endpoint
//!
//! The transport in front of the conversation engine: one inbound user
//! message per request, one reply per response. The driving chat framework
//! is expected to deliver a given user's messages in order.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::engine::Reply;
use crate::AppState;

/// One inbound chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_id: i64,
    pub text: String,
}

/// The bot's reply
///
/// `keyboard` is the button rows to show; an empty list removes the current
/// keyboard, absence leaves it unchanged.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Vec<Vec<String>>>,
}

impl From<Reply> for ChatResponse {
    fn from(reply: Reply) -> Self {
        let keyboard = reply.keyboard.map(|kb| {
            kb.buttons()
                .into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect()
        });
        Self {
            text: reply.text,
            keyboard,
        }
    }
}

/// POST /message
pub async fn post_message(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    tracing::debug!(user_id = request.user_id, "Handling chat message");
    let reply = state
        .engine
        .handle_message(request.user_id, &request.text)
        .await;
    Json(reply.into())
}

/// Build chat routes
pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/message", post(post_message))
}
