use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use dataset::load_csv;
use engine::DashboardContext;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, resolve_dataset_path};

const MAX_REQUEST_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let dataset_path = resolve_dataset_path(&settings.dataset_path)?;
    let dataset = load_csv(&dataset_path, settings.known_sites()).map_err(|error| {
        error!(
            path = %dataset_path.display(),
            %error,
            "failed to load launch dataset; verify the file exists and matches the expected columns"
        );
        error
    })?;

    let ctx = DashboardContext::new(Arc::new(dataset), settings.payload_step);
    let app = build_router(Arc::new(AppState { ctx }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "dashboard listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/healthz", get(api::healthz))
        .route("/api/controls", get(api::control_options))
        .route("/api/charts/pie", get(api::pie_chart))
        .route("/api/charts/scatter", get(api::scatter_chart))
        .route("/api/dashboard", get(api::dashboard))
        .route("/ws", get(api::ws_handler))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
