//! HTTP server for newsgate.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::gateway::Gateway;
use crate::{GatewayError, Result};

use super::router::create_router;

/// HTTP server in front of a [`Gateway`].
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Gateway core.
    gateway: Arc<Gateway>,
    /// How often to sweep expired rate-limit windows.
    sweep_interval: Option<Duration>,
}

impl WebServer {
    /// Create a new server fetching feeds over HTTP.
    pub fn new(config: &Config) -> Result<Self> {
        let gateway = Gateway::with_http_source(config)?;
        Self::with_gateway(config, Arc::new(gateway))
    }

    /// Create a new server around an existing gateway.
    pub fn with_gateway(config: &Config, gateway: Arc<Gateway>) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| GatewayError::Config(format!("invalid server address: {e}")))?;

        let sweep_interval = match config.rate_limit.sweep_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            addr,
            gateway,
            sweep_interval,
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the gateway.
    pub fn gateway(&self) -> Arc<Gateway> {
        self.gateway.clone()
    }

    /// Start the background task that drops expired rate-limit windows.
    fn start_sweep_task(gateway: Arc<Gateway>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let removed = gateway.limiter().sweep_expired();
                if removed > 0 {
                    tracing::info!(removed, "Swept expired rate-limit windows");
                } else {
                    tracing::debug!("No expired rate-limit windows to sweep");
                }
            }
        })
    }

    /// Bind the listener and start the sweeper.
    async fn bind(&self) -> Result<(TcpListener, Option<JoinHandle<()>>)> {
        let listener = TcpListener::bind(self.addr).await?;

        let sweeper = self.sweep_interval.map(|every| {
            tracing::info!(
                interval_secs = every.as_secs(),
                "Rate-limit sweep task started"
            );
            Self::start_sweep_task(self.gateway.clone(), every)
        });

        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        Ok((listener, sweeper))
    }

    /// Run the server until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let (listener, sweeper) = self.bind().await?;
        let router = create_router(self.gateway);

        let served = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await;

        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }
        tracing::info!("Web server stopped");

        served?;
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, _sweeper) = self.bind().await?;
        let local_addr = listener.local_addr()?;
        let router = create_router(self.gateway);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

/// Resolve when the process is asked to stop.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
