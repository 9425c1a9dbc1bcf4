#![deny(missing_docs)]

//! # udyam-core: Foundational Types for the Udyam Registration Wizard
//!
//! Every other crate in the workspace depends on `udyam-core`; it depends on
//! nothing internal. Only `serde`, `serde_json`, `thiserror`, `chrono` and
//! `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **One [`FieldId`] enum.** The thirteen wizard fields are enumerated
//!    once, in declaration order. Wire keys (`adharno`, `hasPan`, ...) only
//!    exist at the serialization boundary; an undeclared key is rejected
//!    with [`UdyamError::UnknownField`].
//!
//! 2. **[`AnswerSet`] is always partial.** No field has to be present until a
//!    requirement predicate says so. Values are plain scalars
//!    ([`FieldValue`]); interpretation belongs to the rule layer.
//!
//! 3. **Newtype wrappers for identifiers.** [`AadhaarNumber`], [`PanNumber`]
//!    and [`Pincode`] validate at construction. Deserialization routes
//!    through the constructor.
//!
//! 4. **Day-granularity dates.** [`FormDate`] parses `DD/MM/YYYY` and
//!    distinguishes malformed input from calendar-invalid dates.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `udyam-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod answers;
pub mod error;
pub mod field;
pub mod identity;
pub mod organization;
pub mod temporal;
pub mod verhoeff;

// Re-export primary types at crate root for ergonomic imports.
pub use answers::AnswerSet;
pub use error::{UdyamError, ValidationError};
pub use field::{FieldId, FieldValue, FIELD_COUNT};
pub use identity::{AadhaarNumber, PanNumber, Pincode, SessionId};
pub use organization::{DateKind, OrganizationType, YesNo};
pub use temporal::{DateError, FormDate};
