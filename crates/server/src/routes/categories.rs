use axum::{
    Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::{
    category::{Category, CreateCategory, UpdateCategory},
    item::Item,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = Category::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(categories)))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategory>,
) -> Result<ResponseJson<ApiResponse<Category>>, ApiError> {
    let category = Category::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategory>,
) -> Result<ResponseJson<ApiResponse<Category>>, ApiError> {
    let category = Category::update(&state.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    Category::delete(&state.db().pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn get_category_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Item>>>, ApiError> {
    Category::find_by_id(&state.db().pool, id).await?;
    let items = Item::find_by_category(&state.db().pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(items)))
}

pub fn router() -> Router<AppState> {
    let categories_router = Router::new()
        .route("/", get(get_categories).post(create_category))
        .route("/{id}", put(update_category).delete(delete_category))
        .route("/{id}/items", get(get_category_items));

    Router::new().nest("/categories", categories_router)
}
