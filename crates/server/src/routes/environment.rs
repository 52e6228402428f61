use axum::{
    Json, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::config;
use executors::env::EnvironmentConfig;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn get_environment(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<EnvironmentConfig>>, ApiError> {
    let environment = config::load_environment(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(environment)))
}

pub async fn put_environment(
    State(state): State<AppState>,
    Json(payload): Json<EnvironmentConfig>,
) -> Result<ResponseJson<ApiResponse<EnvironmentConfig>>, ApiError> {
    config::save_environment(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(payload)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/environment", get(get_environment).put(put_environment))
}
