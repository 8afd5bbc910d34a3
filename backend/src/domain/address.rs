//! Postal address embedded in a [`crate::domain::User`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by the address constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressValidationError {
    CityTooShort { min: usize },
    StreetTooShort { min: usize },
    HouseNumberNotPositive,
}

impl fmt::Display for AddressValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CityTooShort { min } => write!(f, "city must be at least {min} characters"),
            Self::StreetTooShort { min } => {
                write!(f, "street must be at least {min} characters")
            }
            Self::HouseNumberNotPositive => write!(f, "house number must be greater than 0"),
        }
    }
}

impl std::error::Error for AddressValidationError {}

/// Minimum allowed length for a city name.
pub const CITY_MIN: usize = 2;
/// Minimum allowed length for a street name.
pub const STREET_MIN: usize = 3;

/// City name, at least [`CITY_MIN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct City(String);

impl City {
    /// Validate and construct a [`City`].
    pub fn new(city: impl Into<String>) -> Result<Self, AddressValidationError> {
        Self::from_owned(city.into())
    }

    fn from_owned(city: String) -> Result<Self, AddressValidationError> {
        if city.chars().count() < CITY_MIN {
            return Err(AddressValidationError::CityTooShort { min: CITY_MIN });
        }
        Ok(Self(city))
    }
}

impl AsRef<str> for City {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<City> for String {
    fn from(value: City) -> Self {
        value.0
    }
}

impl TryFrom<String> for City {
    type Error = AddressValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Street name, at least [`STREET_MIN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Street(String);

impl Street {
    /// Validate and construct a [`Street`].
    pub fn new(street: impl Into<String>) -> Result<Self, AddressValidationError> {
        Self::from_owned(street.into())
    }

    fn from_owned(street: String) -> Result<Self, AddressValidationError> {
        if street.chars().count() < STREET_MIN {
            return Err(AddressValidationError::StreetTooShort { min: STREET_MIN });
        }
        Ok(Self(street))
    }
}

impl AsRef<str> for Street {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Street> for String {
    fn from(value: Street) -> Self {
        value.0
    }
}

impl TryFrom<String> for Street {
    type Error = AddressValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Strictly positive house number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct HouseNumber(i64);

impl HouseNumber {
    /// Validate and construct a [`HouseNumber`].
    pub fn new(number: i64) -> Result<Self, AddressValidationError> {
        if number <= 0 {
            return Err(AddressValidationError::HouseNumberNotPositive);
        }
        Ok(Self(number))
    }

    /// Underlying number.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<HouseNumber> for i64 {
    fn from(value: HouseNumber) -> Self {
        value.0
    }
}

impl TryFrom<i64> for HouseNumber {
    type Error = AddressValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Postal address.
///
/// ## Invariants
/// - `city` has at least [`CITY_MIN`] characters.
/// - `street` has at least [`STREET_MIN`] characters.
/// - `house_number` is greater than zero.
///
/// Serialises with the field order `city`, `street`, `house_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AddressDto", into = "AddressDto")]
pub struct Address {
    city: City,
    street: Street,
    house_number: HouseNumber,
}

impl Address {
    /// Build an [`Address`] from validated components.
    #[must_use]
    pub fn new(city: City, street: Street, house_number: HouseNumber) -> Self {
        Self {
            city,
            street,
            house_number,
        }
    }

    /// Fallible constructor validating every component, first failure wins.
    pub fn try_from_parts(
        city: impl Into<String>,
        street: impl Into<String>,
        house_number: i64,
    ) -> Result<Self, AddressValidationError> {
        Ok(Self::new(
            City::new(city)?,
            Street::new(street)?,
            HouseNumber::new(house_number)?,
        ))
    }

    /// City name.
    #[must_use]
    pub fn city(&self) -> &City {
        &self.city
    }

    /// Street name.
    #[must_use]
    pub fn street(&self) -> &Street {
        &self.street
    }

    /// House number.
    #[must_use]
    pub fn house_number(&self) -> HouseNumber {
        self.house_number
    }
}

/// Wire shape of [`Address`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AddressDto {
    city: String,
    street: String,
    house_number: i64,
}

impl From<Address> for AddressDto {
    fn from(value: Address) -> Self {
        let Address {
            city,
            street,
            house_number,
        } = value;
        Self {
            city: city.into(),
            street: street.into(),
            house_number: house_number.into(),
        }
    }
}

impl TryFrom<AddressDto> for Address {
    type Error = AddressValidationError;

    fn try_from(value: AddressDto) -> Result<Self, Self::Error> {
        Address::try_from_parts(value.city, value.street, value.house_number)
    }
}
