//! Server Config

use std::time::Duration;

use clap::Args;

/// Listener and lifecycle settings.
#[derive(Debug, Args)]
pub struct ServerRuntimeConfig {
    /// Interface to listen on
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "8698")]
    pub port: u16,

    /// Seconds in-flight requests get to finish after SIGINT or SIGTERM
    #[arg(long, env = "SHUTDOWN_GRACE_SECONDS", default_value_t = 30)]
    pub shutdown_grace_seconds: u64,

    /// Seconds queued order events get to drain once the server has stopped
    #[arg(long, env = "EVENTS_DRAIN_TIMEOUT_SECONDS", default_value_t = 5)]
    pub events_drain_timeout_seconds: u64,
}

impl ServerRuntimeConfig {
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }

    #[must_use]
    pub fn events_drain_timeout(&self) -> Duration {
        Duration::from_secs(self.events_drain_timeout_seconds)
    }
}
