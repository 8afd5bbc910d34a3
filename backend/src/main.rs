//! Server entry-point: wires the registration endpoint, health probes, and
//! OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use registration::inbound::http::health::HealthState;
use registration::settings::RegistrationSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = RegistrationSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.socket_addr()?;
    let registration = settings.registration_engine();
    info!(
        %bind_addr,
        allowed_email_domains = ?registration.email_policy().allowed(),
        "starting registration server"
    );

    let config = ServerConfig::new(bind_addr).with_registration(registration);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::build_metrics());

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
