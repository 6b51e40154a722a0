//! Server configuration loaded via OrthoConfig.
//!
//! Values come from command-line flags, `COMPANY_API_*` environment
//! variables or a configuration file, in that order of precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;

/// Configuration values for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COMPANY_API")]
pub struct ServerSettings {
    /// Address to bind; defaults to all interfaces.
    pub host: Option<IpAddr>,
    /// Port to bind; defaults to 8080.
    pub port: Option<u16>,
    /// Seed two demo companies with employees on startup.
    #[ortho_config(default = false)]
    pub seed_demo_data: bool,
}

impl ServerSettings {
    /// Return the socket address the server binds to.
    ///
    /// # Examples
    /// ```
    /// use company_registry::settings::ServerSettings;
    ///
    /// let settings = ServerSettings {
    ///     host: None,
    ///     port: Some(9000),
    ///     seed_demo_data: false,
    /// };
    /// assert_eq!(settings.bind_addr().to_string(), "0.0.0.0:9000");
    /// ```
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }
}
