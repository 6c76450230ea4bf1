//! Store metadata handler.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::models::StoreConfigResponse;

/// `GET /config` — public store details and the current rate.
pub async fn store_config_handler(
    State(state): State<AppState>,
) -> AppResult<Json<StoreConfigResponse>> {
    let profile = state.chat.profiles().load()?;
    let rate = state.chat.rates().current().await;
    Ok(Json(StoreConfigResponse {
        store: profile.summary(),
        rate,
    }))
}
