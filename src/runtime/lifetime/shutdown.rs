use tokio::signal;
use tracing::{info, warn};

/// Resolve once the process is asked to stop (Ctrl+C).
///
/// If the signal handler cannot be installed this never resolves and the
/// server runs until killed.
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping server...");
        }
        Err(e) => {
            warn!("Failed to listen for Ctrl+C: {}. Graceful shutdown disabled.", e);
            std::future::pending::<()>().await;
        }
    }
}
