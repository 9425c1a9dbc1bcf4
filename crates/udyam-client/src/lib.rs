//! # udyam-client -- HTTP implementations of the wizard's I/O seams
//!
//! Provides the concrete collaborators `udyam-state` talks to:
//! - **Submission** via `POST /submit` ([`HttpTransport`])
//! - **PAN pre-verification** via `POST /validate-pan` ([`HttpTransport::verify_pan`])
//! - **Pincode lookup** via `GET /pincode/{code}` or a built-in table
//!   ([`PincodeLookup`])
//!
//! Plus an offline [`MockSubmissionTransport`] that applies the endpoint's
//! own Aadhaar rules.
//!
//! ## Architecture
//!
//! This crate holds the only `reqwest` usage in the workspace. The wizard
//! sees it solely through the `SubmissionTransport` and `LookupService`
//! traits, so validation and step logic stay free of I/O.

pub mod config;
pub mod error;
pub mod lookup;
pub mod mock;
pub mod submission;

pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use lookup::{HttpLookupService, PincodeLookup, StaticLookupService};
pub use mock::MockSubmissionTransport;
pub use submission::{
    rejection_message, HttpTransport, PanVerificationRequest, PanVerificationResponse,
};
