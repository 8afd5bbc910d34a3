//! Accounts: a [`User`] optionally carrying administrative capability.
//!
//! Administrators are ordinary users with an [`AdminCapability`] attached,
//! rather than a separate user type. Promotion hands a fresh capability to
//! another user at one access level above the promoter.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::user::User;

/// Access level granted to a newly created administrator.
pub const DEFAULT_ACCESS_LEVEL: u8 = 10;

/// Administrative access level; higher values grant more privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AccessLevel(u8);

impl AccessLevel {
    /// Wrap a raw level.
    #[must_use]
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    /// Raw level.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The next level up, if one exists.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        Self(DEFAULT_ACCESS_LEVEL)
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability record marking an account as an administrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdminCapability {
    access_level: AccessLevel,
}

impl AdminCapability {
    /// Capability at the given level.
    #[must_use]
    pub const fn new(access_level: AccessLevel) -> Self {
        Self { access_level }
    }

    /// Granted access level.
    #[must_use]
    pub const fn access_level(&self) -> AccessLevel {
        self.access_level
    }
}

/// Failures raised by [`Account::promote`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromotionError {
    /// Only administrators may promote other users.
    #[error("{promoter} is not an administrator")]
    NotAnAdmin { promoter: String },
    /// The promoter already holds the highest representable level.
    #[error("access level {level} cannot be raised further")]
    AccessLevelOverflow { level: AccessLevel },
}

/// A user plus an optional administrative capability.
///
/// Serialises as the user's fields, followed by `access_level` when the
/// account is an administrator.
///
/// # Examples
/// ```
/// use registration::domain::{Account, AdminCapability, User};
///
/// let user: User = serde_json::from_str(
///     r#"{"name":"Ada","age":36,"email":"ada@example.com",
///         "address":{"city":"London","street":"Baker Street","house_number":221}}"#,
/// )
/// .expect("valid user");
/// let admin = Account::admin(user, AdminCapability::default());
/// assert_eq!(
///     admin.to_string(),
///     "User: Ada, Email: ada@example.com, Access Level: 10"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    #[serde(flatten)]
    user: User,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    admin: Option<AdminCapability>,
}

impl Account {
    /// Account without administrative capability.
    #[must_use]
    pub fn member(user: User) -> Self {
        Self { user, admin: None }
    }

    /// Account holding the given capability.
    #[must_use]
    pub fn admin(user: User, capability: AdminCapability) -> Self {
        Self {
            user,
            admin: Some(capability),
        }
    }

    /// Underlying user.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Administrative capability, if any.
    #[must_use]
    pub fn capability(&self) -> Option<&AdminCapability> {
        self.admin.as_ref()
    }

    /// Whether this account may perform administrative actions.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.admin.is_some()
    }

    /// Grant `candidate` administrative capability one level above this
    /// account's own.
    pub fn promote(&self, candidate: User) -> Result<Account, PromotionError> {
        let Some(capability) = self.admin else {
            return Err(PromotionError::NotAnAdmin {
                promoter: self.user.name().to_string(),
            });
        };
        let level = capability.access_level();
        let next = level
            .next()
            .ok_or(PromotionError::AccessLevelOverflow { level })?;

        info!(
            promoter = %self.user.name(),
            promoted = %candidate.name(),
            access_level = next.get(),
            "promoting user to administrator"
        );
        Ok(Account::admin(candidate, AdminCapability::new(next)))
    }
}

impl From<User> for Account {
    fn from(value: User) -> Self {
        Self::member(value)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User: {}, Email: {}", self.user.name(), self.user.email())?;
        if let Some(capability) = &self.admin {
            write!(f, ", Access Level: {}", capability.access_level())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    fn user(name: &str, email: &str) -> User {
        serde_json::from_value(json!({
            "name": name,
            "age": 30,
            "email": email,
            "is_employed": true,
            "address": {"city": "New York", "street": "5th Avenue", "house_number": 123}
        }))
        .expect("valid user")
    }

    #[fixture]
    fn john() -> User {
        user("John Doe", "john.doe@example.com")
    }

    #[fixture]
    fn admin() -> Account {
        Account::admin(
            user("Admin User", "admin@example.com"),
            AdminCapability::default(),
        )
    }

    #[rstest]
    fn member_display_omits_access_level(john: User) {
        let account = Account::member(john);
        assert_eq!(
            account.to_string(),
            "User: John Doe, Email: john.doe@example.com"
        );
        assert!(!account.is_admin());
    }

    #[rstest]
    fn admin_defaults_to_level_ten(admin: Account) {
        let capability = admin.capability().expect("admin capability");
        assert_eq!(capability.access_level().get(), DEFAULT_ACCESS_LEVEL);
    }

    #[rstest]
    fn promote_grants_one_level_above_promoter(admin: Account, john: User) {
        let promoted = admin.promote(john).expect("admins may promote");
        assert_eq!(
            promoted.capability().map(|c| c.access_level().get()),
            Some(DEFAULT_ACCESS_LEVEL + 1)
        );
        assert_eq!(
            promoted.to_string(),
            "User: John Doe, Email: john.doe@example.com, Access Level: 11"
        );
    }

    #[rstest]
    fn members_cannot_promote(john: User) {
        let member = Account::member(user("Jane Roe", "jane@example.com"));
        let err = member.promote(john).expect_err("members cannot promote");
        assert_eq!(
            err,
            PromotionError::NotAnAdmin {
                promoter: "Jane Roe".to_owned()
            }
        );
    }

    #[rstest]
    fn promotion_stops_at_the_highest_level(john: User) {
        let top = Account::admin(
            user("Root User", "root@example.com"),
            AdminCapability::new(AccessLevel::new(u8::MAX)),
        );
        let err = top.promote(john).expect_err("level overflow");
        assert!(matches!(err, PromotionError::AccessLevelOverflow { .. }));
    }

    #[rstest]
    fn serialises_user_fields_with_optional_access_level(admin: Account, john: User) {
        let member = serde_json::to_value(Account::member(john)).expect("serialise member");
        assert!(member.get("access_level").is_none());
        assert_eq!(member.get("name").and_then(Value::as_str), Some("John Doe"));

        let value = serde_json::to_value(&admin).expect("serialise admin");
        assert_eq!(value.get("access_level").and_then(Value::as_u64), Some(10));
        assert_eq!(
            value.pointer("/address/city").and_then(Value::as_str),
            Some("New York")
        );
    }
}
