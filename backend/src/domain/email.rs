//! Email address primitive and the optional domain allow-list.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors returned by [`EmailAddress::new`] and
/// [`EmailDomainPolicy::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    TooLong { max: usize },
    InvalidFormat,
    DomainNotAllowed { allowed: Vec<String> },
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidFormat => write!(f, "email must be a valid email address"),
            Self::DomainNotAllowed { allowed } => write!(
                f,
                "email must be from one of the following domains: {}",
                allowed.join(", ")
            ),
        }
    }
}

impl std::error::Error for EmailValidationError {}

/// Maximum length of an address as accepted by mail transport.
pub const EMAIL_MAX: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Dot placement in the local part is checked separately.
        let pattern = concat!(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+",
            r"@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
            r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
        );
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Syntactically valid email address, stored exactly as supplied.
///
/// ## Invariants
/// - Exactly one `@` separating a non-empty local part from the domain.
/// - The domain contains at least one `.` and only LDH labels.
/// - The local part neither starts nor ends with `.` and has no `..`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, EmailValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, EmailValidationError> {
        if email.chars().count() > EMAIL_MAX {
            return Err(EmailValidationError::TooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&email) {
            return Err(EmailValidationError::InvalidFormat);
        }

        let local = email.split('@').next().unwrap_or_default();
        if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
            return Err(EmailValidationError::InvalidFormat);
        }

        Ok(Self(email))
    }

    /// Domain part following the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit('@').next().unwrap_or_default()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Restricts which mail domains may register.
///
/// An empty allow-list accepts every domain. Matching is case-insensitive and
/// admits subdomains of an allowed domain.
///
/// # Examples
/// ```
/// use registration::domain::{EmailAddress, EmailDomainPolicy};
///
/// let policy = EmailDomainPolicy::allow_only(["example.com"]);
/// let ok = EmailAddress::new("ada@mail.example.com").expect("valid address");
/// let other = EmailAddress::new("ada@gmail.com").expect("valid address");
/// assert!(policy.check(&ok).is_ok());
/// assert!(policy.check(&other).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailDomainPolicy {
    allowed: Vec<String>,
}

impl EmailDomainPolicy {
    /// Policy accepting every domain.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Policy accepting only the listed domains and their subdomains.
    ///
    /// Blank entries are ignored; entries are lowercased and stripped of a
    /// leading `@` or `.`.
    pub fn allow_only<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = domains
            .into_iter()
            .map(|domain| {
                domain
                    .as_ref()
                    .trim()
                    .trim_start_matches(['@', '.'])
                    .to_ascii_lowercase()
            })
            .filter(|domain| !domain.is_empty())
            .collect();
        Self { allowed }
    }

    /// Allowed domains; empty when every domain is accepted.
    #[must_use]
    pub fn allowed(&self) -> &[String] {
        self.allowed.as_slice()
    }

    /// Check an address against the allow-list.
    pub fn check(&self, email: &EmailAddress) -> Result<(), EmailValidationError> {
        if self.allowed.is_empty() {
            return Ok(());
        }

        let domain = email.domain().to_ascii_lowercase();
        let permitted = self.allowed.iter().any(|allowed| {
            domain == *allowed
                || domain
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        });
        if permitted {
            Ok(())
        } else {
            Err(EmailValidationError::DomainNotAllowed {
                allowed: self.allowed.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("john.doe@example.com")]
    #[case("a+tag@sub.example.co.uk")]
    #[case("x_y-z@test-domain.org")]
    fn accepts_well_formed_addresses(#[case] raw: &str) {
        let email = EmailAddress::new(raw).expect("valid address");
        assert_eq!(email.as_ref(), raw);
    }

    #[rstest]
    #[case("john.doe@examplecom")]
    #[case("john.doe.example.com")]
    #[case("@example.com")]
    #[case("john@")]
    #[case("john@@example.com")]
    #[case(".john@example.com")]
    #[case("john.@example.com")]
    #[case("jo..hn@example.com")]
    #[case("john doe@example.com")]
    #[case("john@-example.com")]
    #[case("")]
    fn rejects_malformed_addresses(#[case] raw: &str) {
        assert_eq!(
            EmailAddress::new(raw),
            Err(EmailValidationError::InvalidFormat)
        );
    }

    #[rstest]
    fn rejects_overlong_addresses() {
        let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
        assert_eq!(
            EmailAddress::new(raw),
            Err(EmailValidationError::TooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    fn domain_returns_text_after_the_at_sign() {
        let email = EmailAddress::new("ada@Example.COM").expect("valid address");
        assert_eq!(email.domain(), "Example.COM");
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("ada@EXAMPLE.com", true)]
    #[case("ada@mail.test.com", true)]
    #[case("ada@notexample.com", false)]
    #[case("ada@gmail.com", false)]
    fn allow_list_matches_domains_and_subdomains(#[case] raw: &str, #[case] expected: bool) {
        let policy = EmailDomainPolicy::allow_only(["example.com", " @test.com ", ""]);
        let email = EmailAddress::new(raw).expect("valid address");
        assert_eq!(policy.check(&email).is_ok(), expected);
    }

    #[rstest]
    fn empty_policy_accepts_everything() {
        let email = EmailAddress::new("bob@gmail.com").expect("valid address");
        assert!(EmailDomainPolicy::any().check(&email).is_ok());
    }

    #[rstest]
    fn rejection_message_lists_allowed_domains() {
        let policy = EmailDomainPolicy::allow_only(["example.com", "test.com"]);
        let email = EmailAddress::new("bob@gmail.com").expect("valid address");
        let err = policy.check(&email).expect_err("domain rejected");
        assert_eq!(
            err.to_string(),
            "email must be from one of the following domains: example.com, test.com"
        );
    }
}
