#![deny(missing_docs)]

//! # udyam-rules: Field Registry, Validation Engine, and Step Gates
//!
//! The wizard's business rules, declared as data and evaluated by one pure
//! function. The wizard layer never validates anything itself; it asks
//! [`ValidationEngine::validate`] and filters the result by step with
//! [`gate::can_advance`].
//!
//! ## Design Principles
//!
//! 1. **Rules as data.** Each field is a [`FieldSpec`] in the
//!    [`Registry`]: kind, ordered constraints, and a `required_when`
//!    predicate. Rules spanning fields live in [`cross_field`].
//!
//! 2. **Deterministic.** The engine takes "today" at construction so a
//!    given answer set always yields the same violations.
//!
//! 3. **Step isolation.** A step's gate only looks at its own fields; an
//!    invalid turnover can never block step 1.
//!
//! ## Crate Policy
//!
//! - Depends only on `udyam-core` internally.
//! - No I/O. Logging is `tracing` events only; the subscriber belongs to
//!   the binary.

pub mod cross_field;
pub mod engine;
pub mod gate;
pub mod registry;
pub mod violation;

pub use cross_field::{CrossFieldRule, CROSS_FIELD_RULES, GSTIN_TURNOVER_THRESHOLD};
pub use engine::ValidationEngine;
pub use gate::{can_advance, evaluate, fields_to_validate, GateVerdict, Step, StepDefinition};
pub use registry::{Constraint, FieldSpec, Registry, ValueKind};
pub use violation::{Severity, Violation, ViolationCode};
