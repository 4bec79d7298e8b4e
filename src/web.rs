use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::WxBriefConfig;
use crate::service::BriefingService;

/// Full application router, API mounted under `/api`
pub fn app(service: Arc<BriefingService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(service))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: WxBriefConfig) -> anyhow::Result<()> {
    let service = BriefingService::from_config(&config)
        .context("Failed to build briefing service")?;
    let app = app(Arc::new(service));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
