//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// For registration failures `details` holds
/// `{"errors": [Violation, ...]}`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "registration payload failed validation (1 violation(s))")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ViolationKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ViolationKind)]
pub enum ViolationKindSchema {
    /// The payload is not a JSON object.
    #[schema(rename = "malformed_input")]
    MalformedInput,
    /// A single field failed its own constraint.
    #[schema(rename = "field_constraint")]
    FieldConstraint,
    /// A rule spanning several fields failed.
    #[schema(rename = "cross_field")]
    CrossField,
}

/// OpenAPI schema for [`crate::domain::Violation`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Violation)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ViolationSchema {
    /// Dotted path of the offending field; empty for the whole payload.
    #[schema(example = "address.city")]
    field: String,
    kind: ViolationKindSchema,
    #[schema(example = "city must be at least 2 characters")]
    message: String,
}

/// OpenAPI schema for [`crate::domain::Address`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Address)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AddressSchema {
    #[schema(min_length = 2, example = "New York")]
    city: String,
    #[schema(min_length = 3, example = "5th Avenue")]
    street: String,
    #[schema(minimum = 1, example = 123)]
    house_number: i64,
}

/// OpenAPI schema for [`crate::domain::User`].
///
/// Registration payloads share this shape; `is_employed` defaults to `true`
/// when omitted and employed users must be between 18 and 65.
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Letters and spaces only.
    #[schema(min_length = 2, max_length = 50, example = "John Doe")]
    name: String,
    #[schema(minimum = 0, maximum = 120, example = 30)]
    age: u8,
    #[schema(format = "email", example = "john.doe@example.com")]
    email: String,
    #[schema(default = true)]
    is_employed: Option<bool>,
    address: AddressSchema,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    // utoipa replaces :: with . in schema names
    #[rstest]
    #[case(ErrorCodeSchema::name(), "crate.domain.ErrorCode")]
    #[case(ErrorSchema::name(), "crate.domain.Error")]
    #[case(ViolationKindSchema::name(), "crate.domain.ViolationKind")]
    #[case(ViolationSchema::name(), "crate.domain.Violation")]
    #[case(AddressSchema::name(), "crate.domain.Address")]
    #[case(UserSchema::name(), "crate.domain.User")]
    fn schemas_are_registered_under_domain_names(
        #[case] name: std::borrow::Cow<'static, str>,
        #[case] expected: &str,
    ) {
        assert_eq!(name, expected);
    }

    #[test]
    fn error_schema_uses_camel_case_trace_id() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert!(schema_json.contains("traceId"));
        assert!(schema_json.contains("details"));
    }

    #[test]
    fn user_schema_lists_registration_fields() {
        let schema_json = schema_to_json::<UserSchema>();
        for field in ["name", "age", "email", "is_employed", "address"] {
            assert!(schema_json.contains(field), "schema should contain {field}");
        }
    }

    #[test]
    fn violation_kind_schema_lists_wire_names() {
        let schema_json = schema_to_json::<ViolationKindSchema>();
        for kind in ["malformed_input", "field_constraint", "cross_field"] {
            assert!(schema_json.contains(kind), "schema should contain {kind}");
        }
    }
}
