//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: the registration endpoint and the health probes
//! - **Schemas**: domain type wrappers from
//!   [`crate::inbound::http::schemas`] that provide OpenAPI definitions
//!   without coupling domain types to the utoipa framework
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    AddressSchema, ErrorCodeSchema, ErrorSchema, UserSchema, ViolationKindSchema, ViolationSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User registration API",
        description = "Validates nested user registration records and echoes their canonical form.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::registration::register,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        AddressSchema,
        ErrorSchema,
        ErrorCodeSchema,
        ViolationSchema,
        ViolationKindSchema
    )),
    tags(
        (name = "registration", description = "User registration validation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const USER_SCHEMA_NAME: &str = "crate.domain.User";
    const ADDRESS_SCHEMA_NAME: &str = "crate.domain.Address";

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        match schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected Object schema for {name}"),
        }
    }

    #[rstest]
    #[case(ERROR_SCHEMA_NAME, &["code", "message", "traceId", "details"][..])]
    #[case(USER_SCHEMA_NAME, &["name", "age", "email", "is_employed", "address"][..])]
    #[case(ADDRESS_SCHEMA_NAME, &["city", "street", "house_number"][..])]
    fn schemas_expose_expected_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let present = schema_fields(name);
        for field in fields {
            assert!(
                present.iter().any(|p| p == field),
                "schema {name} should have field '{field}'"
            );
        }
    }

    #[rstest]
    #[case("/api/v1/register")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn paths_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }
}
