//! # Lookup and PAN Pre-verification Subcommands
//!
//! Thin wrappers over the pincode service and `POST /validate-pan`. Neither
//! result feeds the step gates; both are informational.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use udyam_client::{HttpTransport, PanVerificationRequest, PanVerificationResponse, PincodeLookup};
use udyam_core::Pincode;
use udyam_state::{lookup_with_timeout, Locality, LookupService, WizardConfig};

use crate::document::load_answers;
use crate::EndpointArgs;

/// Arguments for `udyam lookup`.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Six-digit pincode.
    pub pincode: String,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}

/// Arguments for `udyam verify-pan`.
#[derive(Args, Debug)]
pub struct VerifyPanArgs {
    /// Answer file holding the PAN block (`pan`, `panName`, `dob`, `dobType`).
    pub answers: PathBuf,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}

/// Resolve `raw` through `service` within the wizard's lookup timeout.
pub async fn lookup<S: LookupService>(service: &S, raw: &str) -> Result<Option<Locality>> {
    let code = Pincode::new(raw).with_context(|| format!("{raw:?} is not a pincode"))?;
    let timeout = WizardConfig::default().lookup_timeout;
    let found = lookup_with_timeout(service, &code, timeout)
        .await
        .with_context(|| format!("lookup of {code} via {} failed", service.service_name()))?;
    Ok(found)
}

/// Execute `udyam lookup`. Exit code 1 when the code is unknown.
pub async fn run_lookup(args: &LookupArgs) -> Result<u8> {
    let config = args.endpoints.client_config()?;
    let service = PincodeLookup::from_config(&config)?;

    match lookup(&service, &args.pincode).await? {
        Some(found) => {
            println!("{}: {}, {}", args.pincode, found.locality, found.region);
            Ok(0)
        }
        None => {
            println!("{}: not found", args.pincode);
            Ok(1)
        }
    }
}

/// Pre-verify the PAN block of an answer file against `transport`.
pub async fn verify_pan_file(
    transport: &HttpTransport,
    answers: &std::path::Path,
) -> Result<PanVerificationResponse> {
    let answers = load_answers(answers)?;
    let request = PanVerificationRequest::from_answers(&answers)?;
    let verdict = transport.verify_pan(&request).await?;
    Ok(verdict)
}

/// Execute `udyam verify-pan`. Exit code 1 when the PAN is not confirmed.
pub async fn run_verify_pan(args: &VerifyPanArgs) -> Result<u8> {
    let config = args.endpoints.client_config()?;
    let transport = HttpTransport::new(&config)?;

    let verdict = verify_pan_file(&transport, &args.answers).await?;
    println!(
        "{}: {}",
        if verdict.is_valid { "VALID" } else { "INVALID" },
        verdict.message
    );
    Ok(if verdict.is_valid { 0 } else { 1 })
}
