use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::{CinemaAdminError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Permissive CORS for the dashboard frontend during development.
    pub permissive_cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            permissive_cors: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub application_id: String,
    pub http: HttpConfig,
    /// Fallback tracing filter when RUST_LOG is unset.
    pub log_filter: String,
    /// Optional JSON catalog loaded at startup.
    pub seed_file: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            application_id: "cinema-admin".to_string(),
            http: HttpConfig::default(),
            log_filter: "info".to_string(),
            seed_file: None,
        }
    }
}

impl ServiceConfig {
    /// Layered load: optional TOML file, then `CINEMA_ADMIN__*`
    /// environment overrides (`CINEMA_ADMIN__HTTP__PORT=9090`), over the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("CINEMA_ADMIN").separator("__"),
        );
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip = self.http.host.parse().map_err(|_| {
            CinemaAdminError::InvalidArgument(format!(
                "invalid bind host: {}",
                self.http.host
            ))
        })?;
        Ok(SocketAddr::new(ip, self.http.port))
    }
}
