use anyhow::bail;
use dotenvy::dotenv;
use todo_graphql::{
    infrastructure::{config::Config, db},
    telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    telemetry::init();

    let config = Config::from_env()?;
    if config.database.provider != "mongodb" {
        bail!(
            "migrator requires the mongodb provider, found {}",
            config.database.provider
        );
    }
    let database = db::connect(&config.database).await?;
    db::ensure_indexes(&database).await?;

    info!(database = %config.database.name, "collection indexes are in place");

    Ok(())
}
