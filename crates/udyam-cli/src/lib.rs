//! # udyam-cli -- Command-Line Interface for the Registration Wizard
//!
//! Provides the `udyam` binary. It stands in for a form renderer: answers
//! and wizard events come from files instead of a browser, and results are
//! printed to stdout.
//!
//! ## Subcommands
//!
//! - `udyam validate <answers>` -- full-form validation.
//! - `udyam gate --step N <answers>` -- one step's gate verdict.
//! - `udyam run <script>` -- replay a scripted wizard session.
//! - `udyam lookup <pincode>` -- pincode to locality.
//! - `udyam verify-pan <answers>` -- PAN pre-verification.
//!
//! ```bash
//! udyam validate answers.yaml
//! udyam gate --step 2 answers.json
//! udyam run session.yaml --offline
//! ```
//!
//! ## Exit codes
//!
//! `0` success, `1` a negative verdict (violations, closed gate, not
//! found, rejected submission), `2` an operational error.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; rules and state live in the domain crates.
//! - Logs go to stderr so stdout carries only results.

pub mod document;
pub mod remote;
pub mod session;
pub mod validate;

use anyhow::{Context, Result};
use clap::Args;
use url::Url;

use udyam_client::ClientConfig;

/// Endpoint overrides shared by subcommands that reach the network.
///
/// Unset flags fall back to `UDYAM_*` environment variables.
#[derive(Args, Debug, Clone, Default)]
pub struct EndpointArgs {
    /// Base URL of the registration backend (`/submit`, `/validate-pan`).
    #[arg(long)]
    pub submit_url: Option<String>,

    /// Base URL of the pincode service.
    #[arg(long)]
    pub pincode_url: Option<String>,
}

impl EndpointArgs {
    /// Environment configuration with these flags applied on top.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_env().context("invalid UDYAM_* environment")?;
        if let Some(raw) = &self.submit_url {
            config.submit_url =
                Url::parse(raw).with_context(|| format!("invalid --submit-url {raw:?}"))?;
        }
        if let Some(raw) = &self.pincode_url {
            config.pincode_url =
                Some(Url::parse(raw).with_context(|| format!("invalid --pincode-url {raw:?}"))?);
        }
        Ok(config)
    }
}
