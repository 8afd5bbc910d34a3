//! Field paths and violation collection shared by the record validators.
//!
//! Validators never stop at the first failure. Each field check pushes into a
//! [`Violations`] collector so a single call can report every offending field.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dotted path naming the field a violation refers to, e.g. `address.city`.
///
/// The root path renders as an empty string and is used for failures that
/// concern the payload as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// Path referring to the whole payload.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Path for a top-level field.
    #[must_use]
    pub fn field(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// Extend this path with a nested field name.
    #[must_use]
    pub fn join(&self, name: &str) -> Self {
        if self.0.is_empty() {
            return Self::field(name);
        }
        Self(format!("{}.{name}", self.0))
    }

    /// Whether this path refers to the whole payload.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The payload is not JSON, or not a JSON object.
    MalformedInput,
    /// A single field failed its own type, range, length, or pattern rule.
    FieldConstraint,
    /// A rule spanning several fields failed although each field is valid.
    CrossField,
}

/// One reported failure: where it happened, what kind it is, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    field: FieldPath,
    kind: ViolationKind,
    message: String,
}

impl Violation {
    /// Build a violation from its parts.
    #[must_use]
    pub fn new(field: FieldPath, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }

    /// Path of the offending field.
    #[must_use]
    pub fn field(&self) -> &FieldPath {
        &self.field
    }

    /// Failure category.
    #[must_use]
    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Human-readable reason.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_root() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Ordered collection of violations gathered during one validation pass.
///
/// # Examples
/// ```
/// use registration::domain::{FieldPath, Violations};
///
/// let mut violations = Violations::default();
/// violations.field_constraint(FieldPath::field("age"), "age must be between 0 and 120");
/// assert_eq!(violations.len(), 1);
/// assert!(violations.contains(&FieldPath::field("age")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Record an arbitrary violation.
    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    /// Record a [`ViolationKind::FieldConstraint`] failure.
    pub fn field_constraint(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Violation::new(field, ViolationKind::FieldConstraint, message));
    }

    /// Record a [`ViolationKind::CrossField`] failure.
    pub fn cross_field(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Violation::new(field, ViolationKind::CrossField, message));
    }

    /// Capture the error of a field check, returning the value on success.
    pub fn check<T, E: fmt::Display>(&mut self, field: FieldPath, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.field_constraint(field, err.to_string());
                None
            }
        }
    }

    /// Whether no violation has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether any violation refers to `field`.
    #[must_use]
    pub fn contains(&self, field: &FieldPath) -> bool {
        self.0.iter().any(|violation| violation.field() == field)
    }

    /// Iterate over the violations in recording order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Borrow the violations as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Violation] {
        self.0.as_slice()
    }

    /// Convert into `Ok(())` when empty, or `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<Violation> for Violations {
    fn from(value: Violation) -> Self {
        Self(vec![value])
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}
