//! Registration API handler.
//!
//! ```text
//! POST /api/v1/register {"name":"John Doe","age":30,"email":"john.doe@example.com",
//!     "is_employed":true,"address":{"city":"New York","street":"5th Avenue","house_number":123}}
//! ```
//!
//! The body is taken as raw bytes rather than `web::Json` so that syntax
//! errors, type mismatches, and constraint failures all flow through the
//! registration engine and share one failure shape.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, post, web};
use tracing::{debug, error};

use crate::domain::{Error, RegistrationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;

/// Validate a registration payload and echo the canonical user record.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use registration::inbound::http::registration::register;
/// use registration::inbound::http::state::HttpState;
///
/// let app = App::new()
///     .app_data(web::Data::new(HttpState::default()))
///     .service(web::scope("/api/v1").service(register));
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body(content = UserSchema, content_type = "application/json"),
    responses(
        (status = 200, description = "Canonical user record", body = UserSchema),
        (status = 400, description = "Malformed or invalid registration", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["registration"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(state: web::Data<HttpState>, body: web::Bytes) -> ApiResult<HttpResponse> {
    let raw = std::str::from_utf8(&body).map_err(|err| {
        map_registration_error(RegistrationError::Malformed {
            message: format!("payload is not valid UTF-8: {err}"),
        })
    })?;
    let canonical = state
        .registration
        .process_registration(raw)
        .map_err(map_registration_error)?;
    debug!("registration accepted");
    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(canonical))
}

fn map_registration_error(err: RegistrationError) -> Error {
    match &err {
        RegistrationError::Malformed { .. } => {
            Error::invalid_request("registration payload is malformed").with_details(err.to_json())
        }
        RegistrationError::Rejected(violations) => Error::invalid_request(format!(
            "registration payload failed validation ({} violation(s))",
            violations.len()
        ))
        .with_details(err.to_json()),
        RegistrationError::Serialisation { .. } => {
            error!(error = %err, "failed to render registered user");
            Error::internal(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests;
