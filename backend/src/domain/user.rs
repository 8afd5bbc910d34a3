//! User data model.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::address::{Address, AddressDto, AddressValidationError};
use super::email::{EmailAddress, EmailValidationError};

/// Validation errors returned by the [`User`] constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    NameTooShort { min: usize },
    NameTooLong { max: usize },
    NameInvalidCharacters,
    AgeOutOfRange { min: u8, max: u8 },
    EmploymentAgeOutOfRange { min: u8, max: u8 },
    Email(EmailValidationError),
    Address(AddressValidationError),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTooShort { min } => write!(f, "name must be at least {min} characters"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::NameInvalidCharacters => {
                write!(f, "name may only contain letters and spaces")
            }
            Self::AgeOutOfRange { min, max } => {
                write!(f, "age must be between {min} and {max}")
            }
            Self::EmploymentAgeOutOfRange { min, max } => {
                write!(f, "if employed, age must be between {min} and {max}")
            }
            Self::Email(err) => write!(f, "{err}"),
            Self::Address(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<EmailValidationError> for UserValidationError {
    fn from(value: EmailValidationError) -> Self {
        Self::Email(value)
    }
}

impl From<AddressValidationError> for UserValidationError {
    fn from(value: AddressValidationError) -> Self {
        Self::Address(value)
    }
}

/// Minimum allowed length for a person's name.
pub const NAME_MIN: usize = 2;
/// Maximum allowed length for a person's name.
pub const NAME_MAX: usize = 50;
/// Youngest accepted age.
pub const AGE_MIN: u8 = 0;
/// Oldest accepted age.
pub const AGE_MAX: u8 = 120;
/// Youngest age at which a user may declare employment.
pub const EMPLOYMENT_AGE_MIN: u8 = 18;
/// Oldest age at which a user may declare employment.
pub const EMPLOYMENT_AGE_MAX: u8 = 65;
/// Employment status assumed when the payload omits it.
pub const IS_EMPLOYED_DEFAULT: bool = true;

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = r"^[A-Za-z\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("name regex failed to compile: {error}"))
    })
}

/// Person's name made of letters and whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, UserValidationError> {
        let length = name.chars().count();
        if length < NAME_MIN {
            return Err(UserValidationError::NameTooShort { min: NAME_MIN });
        }
        if length > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        if !name_regex().is_match(&name) {
            return Err(UserValidationError::NameInvalidCharacters);
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Age in whole years within [`AGE_MIN`]..=[`AGE_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Age(u8);

impl Age {
    /// Validate and construct an [`Age`].
    pub fn new(years: i64) -> Result<Self, UserValidationError> {
        let out_of_range = UserValidationError::AgeOutOfRange {
            min: AGE_MIN,
            max: AGE_MAX,
        };
        let years = u8::try_from(years).map_err(|_| out_of_range.clone())?;
        if !(AGE_MIN..=AGE_MAX).contains(&years) {
            return Err(out_of_range);
        }
        Ok(Self(years))
    }

    /// Age in years.
    #[must_use]
    pub fn years(self) -> u8 {
        self.0
    }
}

impl From<Age> for i64 {
    fn from(value: Age) -> Self {
        i64::from(value.0)
    }
}

impl TryFrom<i64> for Age {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Enforce the employment rule: employed users must be of working age.
///
/// # Examples
/// ```
/// use registration::domain::{Age, check_employment_age};
///
/// let age = Age::new(70).expect("valid age");
/// assert!(check_employment_age(age, true).is_err());
/// assert!(check_employment_age(age, false).is_ok());
/// ```
pub fn check_employment_age(age: Age, is_employed: bool) -> Result<(), UserValidationError> {
    if is_employed && !(EMPLOYMENT_AGE_MIN..=EMPLOYMENT_AGE_MAX).contains(&age.years()) {
        return Err(UserValidationError::EmploymentAgeOutOfRange {
            min: EMPLOYMENT_AGE_MIN,
            max: EMPLOYMENT_AGE_MAX,
        });
    }
    Ok(())
}

/// Registered user.
///
/// ## Invariants
/// - Every component satisfies its own constraint.
/// - When `is_employed` is true, `age` lies within
///   [`EMPLOYMENT_AGE_MIN`]..=[`EMPLOYMENT_AGE_MAX`].
///
/// Values are immutable once built; the invariants are never re-checked.
/// Serialises with the field order `name`, `age`, `email`, `is_employed`,
/// `address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    name: PersonName,
    age: Age,
    email: EmailAddress,
    is_employed: bool,
    address: Address,
}

impl User {
    /// Build a new [`User`] from validated components, enforcing the
    /// employment rule.
    pub fn try_new(
        name: PersonName,
        age: Age,
        email: EmailAddress,
        is_employed: bool,
        address: Address,
    ) -> Result<Self, UserValidationError> {
        check_employment_age(age, is_employed)?;
        Ok(Self {
            name,
            age,
            email,
            is_employed,
            address,
        })
    }

    /// Person's name.
    #[must_use]
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Age in years.
    #[must_use]
    pub fn age(&self) -> Age {
        self.age
    }

    /// Contact address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Whether the user declared employment.
    #[must_use]
    pub fn is_employed(&self) -> bool {
        self.is_employed
    }

    /// Postal address.
    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn default_is_employed() -> bool {
    IS_EMPLOYED_DEFAULT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UserDto {
    name: String,
    age: i64,
    email: String,
    #[serde(default = "default_is_employed")]
    is_employed: bool,
    address: AddressDto,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            name,
            age,
            email,
            is_employed,
            address,
        } = value;
        Self {
            name: name.into(),
            age: age.into(),
            email: email.into(),
            is_employed,
            address: address.into(),
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let UserDto {
            name,
            age,
            email,
            is_employed,
            address,
        } = value;
        User::try_new(
            PersonName::new(name)?,
            Age::new(age)?,
            EmailAddress::new(email)?,
            is_employed,
            Address::try_from(address)?,
        )
    }
}
