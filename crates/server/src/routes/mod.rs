use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::AppState;

pub mod categories;
pub mod environment;
pub mod events;
pub mod health;
pub mod items;
pub mod settings;

pub fn router(state: AppState) -> Router {
    let base_routes = Router::new()
        .route("/health", get(health::health_check))
        .merge(categories::router())
        .merge(items::router())
        .merge(settings::router())
        .merge(environment::router())
        .merge(events::router())
        .with_state(state);

    Router::new()
        .nest("/api", base_routes)
        .layer(CorsLayer::permissive())
}
