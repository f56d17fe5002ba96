use tokio::net::TcpListener;
use tokio::signal;

use crate::router::build_router;
use crate::state::AppState;

/// Bind `address` and serve until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns `std::io::Error` if the address cannot be bound or serving fails.
pub async fn serve(state: AppState, address: &str) -> std::io::Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(address).await?;
    tracing::info!(address = %listener.local_addr()?, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
            Err(error) => {
                tracing::error!(%error, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
