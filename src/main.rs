use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use jobtrack_backend::services::notification_service::WebhookNotifier;
use jobtrack_backend::store::memory::MemoryStore;
use jobtrack_backend::{
    config::{get_config, init_config},
    middleware, routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(WebhookNotifier::new(
        config.notification_webhook_url.clone(),
        config.webhook_secret.clone(),
    ));
    let app_state = AppState::new(store, notifier);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    // Actor resolution is the outer layer so the limiter can key on it.
    let api = routes::api_router()
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.api_rps),
            middleware::rate_limit::rps_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::actor::require_actor));

    let app = base_routes
        .merge(api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
