use std::net::SocketAddr;

use dotenvy::dotenv;
use schoolhub::logging::{init_tracing, shutdown_tracer};
use schoolhub::metrics::{init_metrics, metrics_app};
use schoolhub::router::init_router;
use schoolhub::state::init_app_state;
use schoolhub_config::ServerConfig;
use schoolhub_db::run_migrations;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        error!(error = %e, "Server exited with an error");
        shutdown_tracer().await;
        std::process::exit(1);
    }

    shutdown_tracer().await;
}

async fn run() -> anyhow::Result<()> {
    let server_config = ServerConfig::from_env();

    let state = init_app_state().await?;
    run_migrations(&state.db).await?;
    info!("Database migrations applied");

    if let Some(handle) = init_metrics() {
        let metrics_addr = format!("{}:{}", server_config.host, server_config.metrics_port);
        match tokio::net::TcpListener::bind(&metrics_addr).await {
            Ok(listener) => {
                info!("Metrics available at http://{}/metrics", metrics_addr);
                tokio::spawn(async move {
                    if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                        warn!(error = %e, "Metrics server stopped");
                    }
                });
            }
            Err(e) => warn!(error = %e, address = %metrics_addr, "Failed to bind metrics server"),
        }
    }

    let app = init_router(state);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Server running on http://{}", address);
    info!("Swagger UI available at http://{}/swagger-ui", address);
    info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
