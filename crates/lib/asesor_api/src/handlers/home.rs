//! Root status endpoint.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::AppState;
use crate::models::HomeResponse;

/// `GET /` — advisor status line and today's rate.
pub async fn home_handler(State(state): State<AppState>) -> Json<HomeResponse> {
    let status = match state.chat.profiles().load() {
        Ok(profile) => profile.status_line(),
        Err(e) => {
            warn!(error = %e, "profile unavailable for status line");
            "activo".to_string()
        }
    };
    let rate = state.chat.rates().current().await;
    Json(HomeResponse {
        status,
        tasa_actual: rate.value,
    })
}
