use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static TELEMETRY: OnceLock<()> = OnceLock::new();

/// Used when `RUST_LOG` is unset; keeps per-resolver GraphQL spans out of the default output.
const DEFAULT_DIRECTIVES: &str = "info,async_graphql=warn";

pub fn init() {
    TELEMETRY.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    });
}
