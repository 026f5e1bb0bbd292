//! Server configuration loaded via OrthoConfig.

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::rendezvous::RendezvousPolicy;

/// Configuration values controlling server startup.
///
/// Values are resolved from (highest precedence first) command-line
/// arguments, `TRUST_ENGINE_*` environment variables, and configuration
/// files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRUST_ENGINE")]
pub struct ServerSettings {
    /// Socket address the HTTP server binds to.
    #[ortho_config(default = "0.0.0.0:8080".to_owned())]
    pub bind_addr: String,
    /// PostgreSQL connection string. In-memory stores are used when unset.
    pub database_url: Option<String>,
    /// Length of the meet confirmation countdown, in minutes.
    #[ortho_config(default = 10)]
    pub rendezvous_window_minutes: i64,
}

impl ServerSettings {
    /// Parse the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] when the address is not a valid
    /// `host:port` pair.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        self.bind_addr.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address '{}': {err}", self.bind_addr),
            )
        })
    }

    /// Build the countdown policy from the configured window.
    ///
    /// Non-positive windows fall back to the default so a misconfigured
    /// deployment cannot produce countdowns that expire instantly.
    pub fn rendezvous_policy(&self) -> RendezvousPolicy {
        if self.rendezvous_window_minutes <= 0 {
            return RendezvousPolicy::default();
        }
        RendezvousPolicy {
            window: TimeDelta::minutes(self.rendezvous_window_minutes),
        }
    }
}
