use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub mod graphql;
pub mod health;

use crate::infrastructure::state::AppState;

pub const TODO_ENDPOINT: &str = "/todo";
pub const USER_ENDPOINT: &str = "/user";

pub fn build_router(state: Arc<AppState>) -> Router {
    let todo_schema = graphql::todo::build_schema(state.todos.clone());
    let user_schema = graphql::user::build_schema(state.users.clone());

    let router = Router::new()
        .route("/health", get(health::healthcheck))
        .nest(TODO_ENDPOINT, graphql::mount(todo_schema, TODO_ENDPOINT))
        .nest(USER_ENDPOINT, graphql::mount(user_schema, USER_ENDPOINT))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config.app.cors_origins) {
        router.layer(cors)
    } else {
        router
    }
}

pub async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "not_found"})),
    )
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    )
}
