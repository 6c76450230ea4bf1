//! Chat request handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::warn;

use crate::AppState;
use crate::models::{ChatRequest, ChatResponse};

/// `POST /chat` — answer a customer message.
///
/// Always `200 OK`: a body that cannot be parsed gets the same apology as an
/// upstream failure.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    match payload {
        Ok(Json(request)) => Json(state.chat.reply(request).await),
        Err(rejection) => {
            warn!(error = %rejection, "unreadable chat request");
            Json(state.chat.apology())
        }
    }
}
