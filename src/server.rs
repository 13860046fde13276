//! HTTP server lifecycle: pool, optional migrations, bind, serve, shutdown.

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::api::routes::create_router;
use crate::config::{Environment, Settings};
use crate::db::{self, establish_async_connection_pool};
use crate::state::AppState;

pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Serves until Ctrl+C or SIGTERM, letting in-flight requests finish.
    pub async fn run(self) -> anyhow::Result<()> {
        let Settings {
            application,
            server,
            database,
            jwt,
            ..
        } = self.settings;

        info!(
            name = %application.name,
            version = %application.version,
            environment = %Environment::from_env(),
            pool_size = database.max_connections,
            token_minutes = jwt.access_token_expire_minutes,
            "starting"
        );

        if database.auto_migrate {
            let url = database.url.clone();
            let applied = tokio::task::spawn_blocking(move || db::run_pending_migrations(&url))
                .await
                .context("migration task panicked")??;
            info!(count = applied.len(), versions = ?applied, "migrations applied");
        }

        let pool = establish_async_connection_pool(&database).await?;

        let deadline = Duration::from_secs(server.request_timeout);
        let app = create_router(AppState::new(pool, jwt), deadline);

        let address = server.address();
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("cannot listen on {address}"))?;
        info!(%address, "listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("stopped");
        Ok(())
    }
}

/// Completes on the first of Ctrl+C or SIGTERM. A signal whose handler
/// cannot be installed never fires.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    info!(signal = received, "shutting down");
}
