use axum::{
    Json, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::config::Settings;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Settings>>, ApiError> {
    let settings = Settings::load(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(settings)))
}

pub async fn put_settings(
    State(state): State<AppState>,
    Json(payload): Json<Settings>,
) -> Result<ResponseJson<ApiResponse<Settings>>, ApiError> {
    payload.save(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(payload)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).put(put_settings))
}
