//! Registration pipeline: raw JSON in, a validated [`User`] or the full list
//! of violations out.
//!
//! Validation is a two-phase pass. The payload is first parsed into a
//! `serde_json::Value`; a syntax error or a non-object document is reported as
//! a single malformed-input failure. Otherwise every field is checked
//! independently against its declared constraint and every failure is
//! collected, so callers see all offending fields in one response.
//!
//! The employment rule spanning `age` and `is_employed` only runs when both
//! fields passed their own checks. A missing `is_employed` takes its default
//! and counts as passed.

use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::debug;

use super::address::{Address, City, HouseNumber, Street};
use super::email::{EmailAddress, EmailDomainPolicy};
use super::user::{Age, IS_EMPLOYED_DEFAULT, PersonName, User, check_employment_age};
use super::validation::{FieldPath, Violation, ViolationKind, Violations};

const FIELD_REQUIRED: &str = "field required";
const EXPECTED_STRING: &str = "input should be a valid string";
const EXPECTED_INTEGER: &str = "input should be a valid integer";
const INTEGER_TOO_LARGE: &str = "integer is too large";
const EXPECTED_BOOLEAN: &str = "input should be a valid boolean";
const EXPECTED_OBJECT: &str = "input should be a valid object";

/// Failure outcome of [`RegistrationEngine::process_registration`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The payload is not JSON or not a JSON object. No field was inspected.
    #[error("malformed input: {message}")]
    Malformed { message: String },
    /// One or more field or cross-field rules failed.
    #[error("registration rejected: {0}")]
    Rejected(Violations),
    /// The validated user could not be rendered as JSON.
    #[error("failed to serialise registered user: {message}")]
    Serialisation { message: String },
}

impl RegistrationError {
    fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Structured entries describing this failure.
    ///
    /// A malformed payload yields exactly one
    /// [`ViolationKind::MalformedInput`] entry at the root path.
    #[must_use]
    pub fn violations(&self) -> Violations {
        match self {
            Self::Malformed { message } => Violations::from(Violation::new(
                FieldPath::root(),
                ViolationKind::MalformedInput,
                message.clone(),
            )),
            Self::Rejected(violations) => violations.clone(),
            Self::Serialisation { .. } => Violations::default(),
        }
    }

    /// Failure body: `{"errors": [{"field", "kind", "message"}, ...]}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({ "errors": self.violations() })
    }
}

/// Validates registration payloads and renders the canonical user JSON.
///
/// The engine holds configuration only and no per-call state, so one
/// instance may serve concurrent requests.
///
/// # Examples
/// ```
/// use registration::domain::RegistrationEngine;
///
/// let engine = RegistrationEngine::new();
/// let raw = r#"{"name":"John Doe","age":30,"email":"john.doe@example.com",
///     "is_employed":true,
///     "address":{"city":"New York","street":"5th Avenue","house_number":123}}"#;
/// let canonical = engine.process_registration(raw).expect("valid registration");
/// assert!(canonical.starts_with(r#"{"name":"John Doe","age":30"#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistrationEngine {
    email_policy: EmailDomainPolicy,
}

impl RegistrationEngine {
    /// Engine accepting every mail domain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the email domain policy.
    #[must_use]
    pub fn with_email_policy(mut self, email_policy: EmailDomainPolicy) -> Self {
        self.email_policy = email_policy;
        self
    }

    /// Active email domain policy.
    #[must_use]
    pub fn email_policy(&self) -> &EmailDomainPolicy {
        &self.email_policy
    }

    /// Validate `raw_json` and return the canonical JSON rendering of the
    /// resulting user.
    pub fn process_registration(&self, raw_json: &str) -> Result<String, RegistrationError> {
        let user = self.validate(raw_json)?;
        serde_json::to_string(&user).map_err(|err| RegistrationError::Serialisation {
            message: err.to_string(),
        })
    }

    /// Validate `raw_json` into a [`User`].
    pub fn validate(&self, raw_json: &str) -> Result<User, RegistrationError> {
        let document: Value = serde_json::from_str(raw_json).map_err(|err| {
            debug!(error = %err, "registration payload is not valid JSON");
            RegistrationError::malformed(format!("payload is not valid JSON: {err}"))
        })?;
        self.validate_value(&document)
    }

    /// Validate an already parsed JSON document into a [`User`].
    pub fn validate_value(&self, document: &Value) -> Result<User, RegistrationError> {
        let Value::Object(object) = document else {
            debug!("registration payload is not a JSON object");
            return Err(RegistrationError::malformed(
                "payload must be a JSON object",
            ));
        };

        let mut violations = Violations::default();
        let reader = FieldReader::new(object, FieldPath::root());
        match self.collect_user(&reader, &mut violations) {
            Some(user) if violations.is_empty() => {
                debug!("registration accepted");
                Ok(user)
            }
            _ => {
                debug!(violations = violations.len(), "registration rejected");
                Err(RegistrationError::Rejected(violations))
            }
        }
    }

    fn collect_user(&self, reader: &FieldReader<'_>, violations: &mut Violations) -> Option<User> {
        let name = reader
            .string("name", violations)
            .and_then(|raw| violations.check(reader.path("name"), PersonName::new(raw)));
        let age = reader
            .integer("age", violations)
            .and_then(|raw| violations.check(reader.path("age"), Age::new(raw)));
        let email = self.collect_email(reader, violations);
        let is_employed = reader.boolean("is_employed", IS_EMPLOYED_DEFAULT, violations);
        let address = reader
            .object("address", violations)
            .and_then(|nested| collect_address(&nested, violations));

        let (Some(age), Some(is_employed)) = (age, is_employed) else {
            return None;
        };
        if let Err(err) = check_employment_age(age, is_employed) {
            violations.cross_field(reader.path("age"), err.to_string());
            return None;
        }

        let (Some(name), Some(email), Some(address)) = (name, email, address) else {
            return None;
        };
        match User::try_new(name, age, email, is_employed, address) {
            Ok(user) => Some(user),
            Err(err) => {
                violations.cross_field(reader.path("age"), err.to_string());
                None
            }
        }
    }

    fn collect_email(
        &self,
        reader: &FieldReader<'_>,
        violations: &mut Violations,
    ) -> Option<EmailAddress> {
        let path = reader.path("email");
        let raw = reader.string("email", violations)?;
        let email = violations.check(path.clone(), EmailAddress::new(raw))?;
        let allowed = self.email_policy.check(&email);
        violations.check(path, allowed).map(|()| email)
    }
}

fn collect_address(reader: &FieldReader<'_>, violations: &mut Violations) -> Option<Address> {
    let city = reader
        .string("city", violations)
        .and_then(|raw| violations.check(reader.path("city"), City::new(raw)));
    let street = reader
        .string("street", violations)
        .and_then(|raw| violations.check(reader.path("street"), Street::new(raw)));
    let house_number = reader
        .integer("house_number", violations)
        .and_then(|raw| violations.check(reader.path("house_number"), HouseNumber::new(raw)));

    let (Some(city), Some(street), Some(house_number)) = (city, street, house_number) else {
        return None;
    };
    Some(Address::new(city, street, house_number))
}

/// Strictly typed field access over one JSON object.
///
/// Values are never coerced: `"30"` is not an integer and `null` is not a
/// string. Type failures are recorded against the field's dotted path.
struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    path: FieldPath,
}

impl<'a> FieldReader<'a> {
    fn new(object: &'a Map<String, Value>, path: FieldPath) -> Self {
        Self { object, path }
    }

    fn path(&self, name: &str) -> FieldPath {
        self.path.join(name)
    }

    fn required(&self, name: &str, violations: &mut Violations) -> Option<&'a Value> {
        let value = self.object.get(name);
        if value.is_none() {
            violations.field_constraint(self.path(name), FIELD_REQUIRED);
        }
        value
    }

    fn string(&self, name: &str, violations: &mut Violations) -> Option<&'a str> {
        let text = self.required(name, violations)?.as_str();
        if text.is_none() {
            violations.field_constraint(self.path(name), EXPECTED_STRING);
        }
        text
    }

    fn integer(&self, name: &str, violations: &mut Violations) -> Option<i64> {
        match self.required(name, violations)? {
            Value::Number(number) if number.is_i64() => number.as_i64(),
            Value::Number(number) if number.is_u64() => {
                violations.field_constraint(self.path(name), INTEGER_TOO_LARGE);
                None
            }
            _ => {
                violations.field_constraint(self.path(name), EXPECTED_INTEGER);
                None
            }
        }
    }

    fn boolean(&self, name: &str, default: bool, violations: &mut Violations) -> Option<bool> {
        match self.object.get(name) {
            None => Some(default),
            Some(Value::Bool(flag)) => Some(*flag),
            Some(_) => {
                violations.field_constraint(self.path(name), EXPECTED_BOOLEAN);
                None
            }
        }
    }

    fn object(&self, name: &str, violations: &mut Violations) -> Option<FieldReader<'a>> {
        match self.required(name, violations)? {
            Value::Object(nested) => Some(FieldReader::new(nested, self.path(name))),
            _ => {
                violations.field_constraint(self.path(name), EXPECTED_OBJECT);
                None
            }
        }
    }
}
