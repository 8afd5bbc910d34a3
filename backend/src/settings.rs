//! Server settings loaded via OrthoConfig.
//!
//! Values layer command-line flags, `REGISTRATION_*` environment variables and
//! an optional configuration file.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};

use crate::domain::{EmailDomainPolicy, RegistrationEngine};

/// Configuration values for the registration server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRATION")]
pub struct RegistrationSettings {
    /// Interface the HTTP listener binds to.
    #[ortho_config(default = "0.0.0.0".to_owned())]
    pub host: String,
    /// TCP port the HTTP listener binds to.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Mail domains accepted for registration. Unset or blank accepts every
    /// domain.
    #[serde(default, deserialize_with = "domain_list")]
    pub allowed_email_domains: Option<Vec<String>>,
}

/// Environment values arrive as a sequence when they contain a comma and as
/// a plain string otherwise; configuration files may use either form.
#[derive(Deserialize)]
#[serde(untagged)]
enum DomainList {
    One(String),
    Many(Vec<String>),
}

fn domain_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = Option::<DomainList>::deserialize(deserializer)?;
    Ok(list.map(|list| match list {
        DomainList::One(raw) => raw.split(',').map(str::to_owned).collect(),
        DomainList::Many(domains) => domains,
    }))
}

impl RegistrationSettings {
    /// Resolve `host:port` into the address the listener binds to.
    pub fn socket_addr(&self) -> io::Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::other(format!("no socket address for {}:{}", self.host, self.port))
            })
    }

    /// Email domain policy derived from `allowed_email_domains`.
    pub fn email_policy(&self) -> EmailDomainPolicy {
        match &self.allowed_email_domains {
            Some(domains) => EmailDomainPolicy::allow_only(domains),
            None => EmailDomainPolicy::any(),
        }
    }

    /// Registration engine configured from these settings.
    pub fn registration_engine(&self) -> RegistrationEngine {
        RegistrationEngine::new().with_email_policy(self.email_policy())
    }
}
