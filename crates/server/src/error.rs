use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::{category::CategoryError, config::ConfigError, item::ItemError};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Item(#[from] ItemError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Category(CategoryError::NotFound) => {
                (StatusCode::NOT_FOUND, "CategoryError")
            }
            ApiError::Category(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CategoryError"),
            ApiError::Item(ItemError::NotFound) => (StatusCode::NOT_FOUND, "ItemError"),
            ApiError::Item(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ItemError"),
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ConfigError"),
        };

        let response = ApiResponse::<()>::error(&format!("{}: {}", error_type, self));
        (status_code, Json(response)).into_response()
    }
}
