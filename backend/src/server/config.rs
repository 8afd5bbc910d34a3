//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use registration::domain::RegistrationEngine;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) registration: RegistrationEngine,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration accepting every mail domain.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            registration: RegistrationEngine::new(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Replace the registration engine served by the HTTP handlers.
    #[must_use]
    pub fn with_registration(mut self, registration: RegistrationEngine) -> Self {
        self.registration = registration;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
