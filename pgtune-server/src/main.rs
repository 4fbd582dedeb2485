//! pgtune Server - HTTP API for the settings calculator

mod api;

use pgtune_core::TuneError;
use std::env;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the listen address
const HTTP_ADDR_ENV: &str = "PGTUNE_HTTP_ADDR";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen address
    pub http_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8087)),
        }
    }
}

impl ServerConfig {
    /// Defaults, overridden by `PGTUNE_HTTP_ADDR` when set
    pub fn from_env() -> Result<Self, TuneError> {
        Self::from_addr(env::var(HTTP_ADDR_ENV).ok().as_deref())
    }

    fn from_addr(addr: Option<&str>) -> Result<Self, TuneError> {
        let mut config = Self::default();
        if let Some(addr) = addr {
            config.http_addr = addr.parse().map_err(|e| {
                TuneError::Config(format!("{} '{}': {}", HTTP_ADDR_ENV, addr, e))
            })?;
        }
        Ok(config)
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let config = ServerConfig::from_env()?;

    info!("Starting pgtune server v{}...", pgtune_core::VERSION);

    // Create router
    let app = api::create_router();

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!("pgtune server listening on http://{}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::from_addr(None).unwrap();
        assert_eq!(config.http_addr.port(), 8087);
    }

    #[test]
    fn test_addr_override() {
        let config = ServerConfig::from_addr(Some("127.0.0.1:9000")).unwrap();
        assert_eq!(config.http_addr, "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn test_invalid_addr() {
        let err = ServerConfig::from_addr(Some("not-an-addr")).unwrap_err();
        assert!(matches!(err, TuneError::Config(_)));
    }
}
