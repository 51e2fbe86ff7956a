use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transit_board::catalog::Catalog;
use transit_board::config::DashboardConfig;
use transit_board::dashboard::LiveDashboard;
use transit_board::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transit_board=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail fast on bad configuration
    let config = DashboardConfig::from_env().expect("Invalid configuration");
    let catalog = Arc::new(Catalog::embedded().expect("Failed to load station data"));
    tracing::info!(stations = catalog.len(), "loaded station catalog");

    let dashboard = Arc::new(
        LiveDashboard::connect(&config, catalog.clone()).expect("Failed to start dashboard"),
    );

    let app = create_router(AppState::new(dashboard.clone(), catalog));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Transit dashboard listening on http://{}", config.listen_addr);
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  GET  /api/dashboard   - Current arrivals and availability");
    tracing::info!("  GET  /api/stations    - Selectable rail stations");
    tracing::info!("  PUT  /api/rail/:index - Change a rail panel's station");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutting down");
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        tracing::error!(error = %e, "server error");
    }

    dashboard.stop_all().await;
}
