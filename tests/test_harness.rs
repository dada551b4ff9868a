#![allow(dead_code)]

use std::{future::Future, sync::Arc};

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use todo_graphql::{
    api,
    infrastructure::{
        config::{AuthConfig, Config, DatabaseConfig},
        db,
        state::AppState,
        storage::{MongoTodoRepository, MongoUserRepository, Repositories},
    },
};
use tower::ServiceExt;

pub fn memory_config() -> Config {
    Config {
        database: DatabaseConfig {
            provider: "memory".to_string(),
            ..DatabaseConfig::default()
        },
        auth: AuthConfig { bcrypt_cost: 4 },
        ..Config::default()
    }
}

pub fn memory_app() -> Router {
    let state = AppState::new(Arc::new(memory_config()), Repositories::in_memory());
    api::build_router(Arc::new(state))
}

/// Runs `test` against a scratch MongoDB database, or skips when `MONGODB_URI` is unset.
pub async fn run_mongo_test<F, Fut>(test: F) -> Result<()>
where
    F: FnOnce(Repositories) -> Fut,
    Fut: Future<Output = Result<()>> + Send,
{
    dotenvy::dotenv().ok();
    let Ok(url) = std::env::var("MONGODB_URI") else {
        eprintln!("Skipping integration test: MONGODB_URI is not set");
        return Ok(());
    };

    let config = DatabaseConfig {
        url,
        name: format!("todo_graphql_test_{}", mongodb::bson::oid::ObjectId::new()),
        ..DatabaseConfig::default()
    };
    let database = match db::connect(&config).await {
        Ok(database) => database,
        Err(err) => {
            eprintln!("Skipping integration test: unable to connect to database: {err:#}");
            return Ok(());
        }
    };
    db::ensure_indexes(&database).await?;

    let repositories = Repositories {
        todos: Arc::new(MongoTodoRepository::new(&database)),
        users: Arc::new(MongoUserRepository::new(&database)),
    };
    let outcome = test(repositories).await;
    database.drop().await?;
    outcome
}

/// POSTs a GraphQL document to `endpoint` and returns the decoded response envelope.
pub async fn graphql(app: &Router, endpoint: &str, query: &str, variables: Value) -> Result<Value> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(endpoint)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "query": query, "variables": variables }).to_string(),
                ))
                .expect("failed to build graphql request"),
        )
        .await
        .expect("service error");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 1024 * 1024).await?;
    Ok(serde_json::from_slice(&body)?)
}
