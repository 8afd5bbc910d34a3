//! Tests for the registration endpoint.

use super::*;
use crate::Trace;
use crate::domain::{EmailDomainPolicy, ErrorCode, RegistrationEngine, TRACE_ID_HEADER};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const VALID: &str = r#"{"name":"John Doe","age":30,"email":"john.doe@example.com","is_employed":true,"address":{"city":"New York","street":"5th Avenue","house_number":123}}"#;

#[fixture]
fn state() -> HttpState {
    HttpState::new(RegistrationEngine::new())
}

async fn post_raw(
    state: HttpState,
    body: impl Into<web::Bytes>,
) -> (StatusCode, Option<String>, Vec<u8>) {
    let app = actix_test::init_service(
        App::new()
            .wrap(Trace)
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(register)),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/register")
        .insert_header(ContentType::json())
        .set_payload(body.into())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = actix_test::read_body(response).await.to_vec();
    (status, trace_id, body)
}

fn error_entries(body: &[u8]) -> (Value, Vec<Value>) {
    let value: Value = serde_json::from_slice(body).expect("error payload");
    let entries = value
        .pointer("/details/errors")
        .and_then(Value::as_array)
        .cloned()
        .expect("details.errors present");
    (value, entries)
}

#[rstest]
#[actix_web::test]
async fn accepts_valid_registrations(state: HttpState) {
    let (status, trace_id, body) = post_raw(state, VALID).await;

    assert_eq!(status, StatusCode::OK);
    assert!(trace_id.is_some());
    assert_eq!(std::str::from_utf8(&body).expect("utf8 body"), VALID);
}

#[rstest]
#[actix_web::test]
async fn reports_every_violation_in_the_envelope(state: HttpState) {
    let payload = json!({
        "name": "J",
        "age": 150,
        "email": "nope",
        "address": {"city": "A", "street": "5th Avenue", "house_number": 0}
    });

    let (status, trace_id, body) = post_raw(state, payload.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (value, entries) = error_entries(&body);
    assert_eq!(value.get("code").and_then(Value::as_str), Some("invalid_request"));
    assert_eq!(value.get("traceId").and_then(Value::as_str), trace_id.as_deref());
    let fields: Vec<_> = entries
        .iter()
        .filter_map(|entry| entry.get("field").and_then(Value::as_str))
        .collect();
    assert_eq!(
        fields,
        ["name", "age", "email", "address.city", "address.house_number"]
    );
}

#[rstest]
#[case::syntax(b"{not json".to_vec())]
#[case::array(b"[1, 2, 3]".to_vec())]
#[case::invalid_utf8(vec![0xff, 0xfe, 0x7b])]
#[actix_web::test]
async fn malformed_payloads_yield_a_single_entry(state: HttpState, #[case] body: Vec<u8>) {
    let (status, _, body) = post_raw(state, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (value, entries) = error_entries(&body);
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("registration payload is malformed")
    );
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].get("kind").and_then(Value::as_str), Some("malformed_input"));
    assert_eq!(entries[0].get("field").and_then(Value::as_str), Some(""));
}

#[rstest]
#[actix_web::test]
async fn employment_rule_is_reported_as_cross_field(state: HttpState) {
    let payload = json!({
        "name": "Old Timer",
        "age": 70,
        "email": "old.timer@example.com",
        "address": {"city": "Boston", "street": "Main Street", "house_number": 7}
    });

    let (status, _, body) = post_raw(state, payload.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, entries) = error_entries(&body);
    assert_eq!(
        entries,
        vec![json!({
            "field": "age",
            "kind": "cross_field",
            "message": "if employed, age must be between 18 and 65"
        })]
    );
}

#[rstest]
#[actix_web::test]
async fn configured_email_policy_is_enforced() {
    let state = HttpState::new(
        RegistrationEngine::new().with_email_policy(EmailDomainPolicy::allow_only(["test.com"])),
    );

    let (status, _, body) = post_raw(state, VALID).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, entries) = error_entries(&body);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].get("field").and_then(Value::as_str), Some("email"));
}

#[rstest]
fn serialisation_failures_map_to_internal_errors() {
    let error = map_registration_error(RegistrationError::Serialisation {
        message: "boom".to_owned(),
    });
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert!(error.details().is_none());
}
