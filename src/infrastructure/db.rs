use anyhow::Context;
use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};
use tracing::info;

use super::config::DatabaseConfig;
use crate::domain::models::User;

pub const TODOS_COLLECTION: &str = "todos";
pub const USERS_COLLECTION: &str = "users";

pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Database> {
    let mut options = ClientOptions::parse(&config.url)
        .await
        .with_context(|| "failed to parse MongoDB connection string")?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.max_pool_size = Some(config.max_connections);

    let client = Client::with_options(options).with_context(|| "failed to create MongoDB client")?;
    let database = client.database(&config.name);
    database
        .run_command(doc! { "ping": 1 })
        .await
        .with_context(|| "failed to connect to MongoDB")?;

    info!(url = %config.redacted_url(), database = %config.name, "connected to MongoDB");
    Ok(database)
}

/// Creates the indexes the stores rely on. Safe to run repeatedly.
pub async fn ensure_indexes(database: &Database) -> anyhow::Result<()> {
    let unique_username = IndexModel::builder()
        .keys(doc! { "username": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    database
        .collection::<User>(USERS_COLLECTION)
        .create_index(unique_username)
        .await
        .with_context(|| "failed to create unique username index")?;
    Ok(())
}
