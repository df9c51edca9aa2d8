//! HTTP server setup.
//!
//! # Responsibilities
//! - Wire up request tracing around the finished router
//! - Bind the router to a listener
//! - Stop accepting on shutdown signal and drain in-flight requests

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Serve `router` until Ctrl+C.
pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    serve_with_shutdown(listener, router, shutdown_signal()).await
}

/// Serve `router` until `signal` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    router: Router,
    signal: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(
        address = %addr,
        "HTTP server starting"
    );

    let app = router.layer(TraceLayer::new_for_http());
    axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
