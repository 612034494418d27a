use crate::admission::AdmissionController;
use crate::config::Config;
use crate::handlers::{
    get_metrics, get_status, health_check, put_trace_segments, set_ok, set_throttled, AppState,
    SharedState,
};
use crate::middleware::logging_middleware;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct Server {
    app: Router,
    bind_addr: SocketAddr,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let controller = AdmissionController::from_config(&config);
        tracing::info!(
            strategy = %controller.strategy(),
            bucket = ?controller.bucket_snapshot(),
            "Admission controller ready"
        );

        let state: SharedState = Arc::new(AppState::new(controller));
        let app = create_app(state, config.enable_tracing);

        Self {
            app,
            bind_addr: config.bind_addr,
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = tokio::net::TcpListener::bind(self.bind_addr).await?;

        tracing::info!("Starting server on {}", self.bind_addr);
        tracing::info!("Trace segments accepted at /TraceSegments");

        // Run server with graceful shutdown
        axum::serve(
            listener,
            self.app
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

/// Build the router around an existing state
pub fn create_app(state: SharedState, enable_tracing: bool) -> Router {
    let app = Router::new()
        // Ingestion endpoint
        .route("/TraceSegments", post(put_trace_segments))
        // Administrative endpoints
        .route("/SetOK", post(set_ok))
        .route("/SetThrottled", post(set_throttled))
        .route("/status", get(get_status))
        .route("/metrics", get(get_metrics))
        .route("/healthz", get(health_check))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(logging_middleware)),
        );

    if enable_tracing {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        },
    }
}
