//! # udyam-state: Wizard State Machine and I/O Seams
//!
//! Drives one registration session through its steps. Validation is
//! delegated to `udyam-rules`; network calls go through two traits whose
//! implementations live in `udyam-client`.
//!
//! ## Components
//!
//! - **Wizard** (`wizard.rs`): `Step1 → Step2 → Step3 → Submitting →
//!   {Submitted, SubmissionFailed}` with a transition log, the displayed
//!   violations, and the PAN re-validation lock.
//!
//! - **Submission transport** (`transport.rs`): the `SubmissionTransport`
//!   seam and the `TransportError` taxonomy with its banner text.
//!
//! - **Pincode lookup** (`lookup.rs`): the `LookupService` seam and a
//!   generation-counted tracker that drops superseded results.
//!
//! ## Concurrency
//!
//! Each event runs to completion before the next is accepted; the wizard
//! is `&mut`-driven and needs no locking. Submission and lookup are the
//! only suspending calls and both fail soft after a configured timeout.

pub mod lookup;
pub mod transport;
pub mod wizard;

// ─── Wizard re-exports ──────────────────────────────────────────────

pub use wizard::{
    AdvanceOutcome, Banner, BannerKind, SubmitOutcome, Wizard, WizardConfig, WizardError,
    WizardPhase, WizardSnapshot, WizardTransitionRecord, PAN_CORRECTION_BANNER,
};

// ─── Seam re-exports ────────────────────────────────────────────────

pub use lookup::{
    lookup_with_timeout, Locality, LookupError, LookupService, LookupTicket, PincodeDisplay,
    PincodeTracker,
};
pub use transport::{SubmissionReceipt, SubmissionTransport, TransportError};
