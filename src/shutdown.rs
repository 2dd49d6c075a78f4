use tracing::info;

/// Resolves when the process receives a termination signal; handed to
/// axum's `with_graceful_shutdown` so in-flight requests drain first.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to setup SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to setup SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT (Ctrl+C), shutting down");
            }
        }
    }

    #[cfg(windows)]
    {
        use tokio::signal::windows::{ctrl_break, ctrl_c};

        let mut ctrl_c = ctrl_c().expect("Failed to setup Ctrl+C handler");
        let mut ctrl_break = ctrl_break().expect("Failed to setup Ctrl+Break handler");

        tokio::select! {
            _ = ctrl_c.recv() => {
                info!("Received Ctrl+C, shutting down");
            }
            _ = ctrl_break.recv() => {
                info!("Received Ctrl+Break, shutting down");
            }
        }
    }
}
