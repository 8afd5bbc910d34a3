//! Domain primitives and aggregates.
//!
//! Purpose: Define the strongly typed registration records and the engine
//! that validates raw payloads into them. Types are immutable once built and
//! document their invariants and serialisation contracts (serde) in Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - User / Address — validated registration records.
//! - RegistrationEngine — raw JSON to canonical JSON or violations.
//! - Account — user plus optional administrative capability.

pub mod account;
pub mod address;
pub mod email;
pub mod error;
pub mod registration;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::account::{AccessLevel, Account, AdminCapability, PromotionError};
pub use self::address::{Address, AddressValidationError, City, HouseNumber, Street};
pub use self::email::{EmailAddress, EmailDomainPolicy, EmailValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::registration::{RegistrationEngine, RegistrationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Age, PersonName, User, UserValidationError, check_employment_age};
pub use self::validation::{FieldPath, Violation, ViolationKind, Violations};
