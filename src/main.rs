use ai_llm_service::telemetry;
use tracing::{Level, info, warn};
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` is optional; real deployments pass the environment directly.
    let dotenv = dotenvy::dotenv();

    // Service crates get the detailed layer; dependencies (tower_http request
    // traces, hyper, reqwest) get a plain one.
    let third_party = fmt::layer()
        .with_target(true)
        .with_filter(filter::filter_fn(|meta| {
            !telemetry::is_service_target(meta.target())
        }));

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .with(third_party)
        .try_init()?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) => warn!(error = %e, "no .env loaded, using process environment"),
    }

    api::start().await?;

    Ok(())
}
