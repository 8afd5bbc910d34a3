//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they depend
//! on the registration engine only and remain testable without I/O.

use std::sync::Arc;

use crate::domain::RegistrationEngine;

/// Dependency bundle for HTTP handlers.
#[derive(Clone, Default)]
pub struct HttpState {
    pub registration: Arc<RegistrationEngine>,
}

impl HttpState {
    /// Bundle a configured engine for handler injection.
    ///
    /// # Examples
    /// ```
    /// use registration::domain::RegistrationEngine;
    /// use registration::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(RegistrationEngine::new());
    /// assert!(state.registration.email_policy().allowed().is_empty());
    /// ```
    pub fn new(registration: RegistrationEngine) -> Self {
        Self {
            registration: Arc::new(registration),
        }
    }
}
