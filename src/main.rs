use anyhow::Result;
use tracing::info;
use wxbrief::{VERSION, WxBriefConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WxBriefConfig::load()?;
    telemetry::init(&config.logging);

    info!(version = VERSION, "Starting wxbrief");
    if config.generation.api_key.is_none() {
        tracing::warn!("No generation API key configured; briefings will carry an error notice");
    }

    web::run(config).await
}
