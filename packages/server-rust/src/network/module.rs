//! Network module with deferred startup lifecycle.
//!
//! `new()` wires shared state, `start()` binds the TCP listener, and
//! `serve()` accepts requests until the shutdown future resolves.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::handlers::{routes, AppState};
use super::middleware::build_http_layers;
use super::shutdown::ShutdownController;
use crate::service::{ServerConfig, TweetOrchestrator};

/// Manages the HTTP server lifecycle.
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    shutdown: Arc<ShutdownController>,
    state: AppState,
}

impl NetworkModule {
    /// Creates the module and its shared state without binding any port.
    #[must_use]
    pub fn new(
        config: NetworkConfig,
        server_config: &ServerConfig,
        orchestrator: TweetOrchestrator,
    ) -> Self {
        let shutdown = Arc::new(ShutdownController::new());
        let state = AppState::new(
            Arc::clone(&shutdown),
            Arc::new(config.clone()),
            server_config,
            orchestrator,
        );
        Self {
            config,
            listener: None,
            shutdown,
            state,
        }
    }

    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Assembles the axum router with all routes and HTTP middleware.
    pub fn build_router(&self) -> Router {
        routes()
            .layer(build_http_layers(&self.config))
            .with_state(self.state.clone())
    }

    /// Binds the TCP listener and returns the bound port.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();
        info!(host = %self.config.host, port, "TCP listener bound");
        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then drains.
    ///
    /// After the signal the health state moves to `Draining`, in-flight
    /// requests get up to `drain_timeout` to finish, and the notification
    /// publisher is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server hits
    /// a fatal I/O error.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;
        let controller = self.shutdown;

        controller.set_ready();
        info!("serving tweet API");

        let signal_controller = Arc::clone(&controller);
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                signal_controller.trigger_shutdown();
            })
            .await?;

        if controller.wait_for_drain(self.config.drain_timeout).await {
            info!("all in-flight requests drained");
        } else {
            warn!(
                in_flight = controller.in_flight_count(),
                "drain timeout expired with requests still in flight"
            );
        }
        self.state.orchestrator.publisher().close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::network::HealthState;
    use crate::notify::NullPublisher;
    use crate::storage::InMemoryTweetService;

    fn module() -> NetworkModule {
        let orchestrator = TweetOrchestrator::new(
            Arc::new(InMemoryTweetService::new()),
            Arc::new(NullPublisher),
            Duration::from_secs(1),
        );
        let config = NetworkConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..NetworkConfig::default()
        };
        NetworkModule::new(config, &ServerConfig::default(), orchestrator)
    }

    #[test]
    fn new_creates_module_without_binding() {
        let module = module();
        assert!(module.listener.is_none());
        assert_eq!(module.shutdown_controller().health_state(), HealthState::Starting);
    }

    #[tokio::test]
    async fn start_binds_to_os_assigned_port() {
        let mut module = module();
        let port = module.start().await.unwrap();
        assert!(port > 0);
        assert!(module.listener.is_some());
    }

    #[tokio::test]
    async fn serve_without_start_is_an_error() {
        let err = module().serve(std::future::ready(())).await.unwrap_err();
        assert!(err.to_string().contains("start()"));
    }

    #[tokio::test]
    async fn serve_stops_after_shutdown_signal() {
        let mut module = module();
        module.start().await.unwrap();
        let controller = module.shutdown_controller();

        module.serve(std::future::ready(())).await.unwrap();
        assert_eq!(controller.health_state(), HealthState::Stopped);
    }
}
