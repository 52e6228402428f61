use axum::{
    Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::{
    config::{self, Settings},
    item::{CreateItem, Item, UpdateItem},
};
use executors::orchestrator::ExecutionResult;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn get_items(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Item>>>, ApiError> {
    let items = Item::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(items)))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItem>,
) -> Result<ResponseJson<ApiResponse<Item>>, ApiError> {
    let item = Item::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItem>,
) -> Result<ResponseJson<ApiResponse<Item>>, ApiError> {
    let item = Item::update(&state.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(item)))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    Item::delete(&state.db().pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// Execute a stored item and report its outcome. The response resolves when
/// the run resolves, which for detached launches is immediately after the
/// launch is acknowledged.
pub async fn run_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<ExecutionResult>>, ApiError> {
    let item = Item::find_by_id(&state.db().pool, id).await?;
    let settings = Settings::load(&state.db().pool).await?;
    let environment = config::load_environment(&state.db().pool).await?;

    let launchable = item.to_launchable();
    tracing::info!(item = %launchable.name, item_type = %launchable.item_type, "running item");

    let result = state
        .launcher()
        .run(&launchable, &environment, settings.auto_minimize_after_run)
        .await;
    Ok(ResponseJson(ApiResponse::success(result)))
}

pub fn router() -> Router<AppState> {
    let items_router = Router::new()
        .route("/", get(get_items).post(create_item))
        .route("/{id}", put(update_item).delete(delete_item))
        .route("/{id}/run", post(run_item));

    Router::new().nest("/items", items_router)
}
