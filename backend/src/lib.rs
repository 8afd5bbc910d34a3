//! User registration validation service.
//!
//! The [`domain`] module holds the validated records and the
//! [`domain::RegistrationEngine`]; [`inbound::http`] exposes it over REST.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
