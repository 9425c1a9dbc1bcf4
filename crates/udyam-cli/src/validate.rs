//! # Validate and Gate Subcommands
//!
//! `udyam validate` runs every field rule over an answer file.
//! `udyam gate` evaluates a single step's gate, which only looks at the
//! fields that step owns.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use udyam_rules::{evaluate, GateVerdict, Step, ValidationEngine, Violation};

use crate::document::load_answers;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per finding.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Arguments for `udyam validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Answer file (JSON or YAML), keyed by wire keys.
    pub answers: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Arguments for `udyam gate`.
#[derive(Args, Debug)]
pub struct GateArgs {
    /// Step number (1, 2 or 3).
    #[arg(long)]
    pub step: u8,

    /// Answer file (JSON or YAML), keyed by wire keys.
    pub answers: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Full-form validation of an answer file.
pub fn validate_file(path: &Path) -> Result<Vec<Violation>> {
    let answers = load_answers(path)?;
    let engine = ValidationEngine::standard();
    engine
        .validate(&answers)
        .with_context(|| format!("validation of {} aborted", path.display()))
}

/// Gate verdict of `step` for an answer file.
pub fn gate_file(path: &Path, step: u8) -> Result<GateVerdict> {
    let Some(step) = Step::from_number(step) else {
        bail!("no step {step}; the wizard has steps 1 to 3");
    };
    let answers = load_answers(path)?;
    let engine = ValidationEngine::standard();
    evaluate(&engine, step, &answers)
        .with_context(|| format!("gate evaluation of {} aborted", path.display()))
}

/// Execute `udyam validate`. Exit code 1 when any rule fails.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let violations = validate_file(&args.answers)?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&violations)?),
        OutputFormat::Text => {
            if violations.is_empty() {
                println!("OK: {} passes every field rule", args.answers.display());
            } else {
                println!("{} violation(s):", violations.len());
                for v in &violations {
                    println!("  FAIL: {v}");
                }
            }
        }
    }

    tracing::debug!(violations = violations.len(), "validate finished");
    Ok(if violations.is_empty() { 0 } else { 1 })
}

/// Execute `udyam gate`. Exit code 1 when the gate is closed.
pub fn run_gate(args: &GateArgs) -> Result<u8> {
    let verdict = gate_file(&args.answers, args.step)?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&verdict)?),
        OutputFormat::Text => {
            let fields: Vec<String> = verdict.fields.iter().map(ToString::to_string).collect();
            println!("{} ({})", verdict.step, verdict.step.title());
            println!("  gated fields: {}", fields.join(", "));
            for v in &verdict.violations {
                println!("  FAIL: {v}");
            }
            println!("  gate: {}", if verdict.is_open() { "open" } else { "closed" });
        }
    }

    Ok(if verdict.is_open() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use udyam_core::FieldId;
    use udyam_rules::ViolationCode;

    fn answers_file(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("answers.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    const PROPRIETOR: &str = r#"{
        "adharno": "234567890124",
        "ownername": "Asha Verma",
        "aadhaarDeclaration": true,
        "organizationType": "1",
        "hasPan": "no"
    }"#;

    #[test]
    fn test_clean_answers_pass() {
        let dir = tempfile::tempdir().unwrap();
        let path = answers_file(&dir, PROPRIETOR);
        assert!(validate_file(&path).unwrap().is_empty());

        let args = ValidateArgs {
            answers: path,
            output: OutputFormat::Text,
        };
        assert_eq!(run_validate(&args).unwrap(), 0);
    }

    #[test]
    fn test_violations_exit_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = answers_file(
            &dir,
            r#"{"adharno": "12345", "ownername": "A", "aadhaarDeclaration": true,
                "organizationType": "3", "hasPan": "no"}"#,
        );
        let violations = validate_file(&path).unwrap();
        assert_eq!(violations[0].field, FieldId::AadhaarNumber);
        assert!(violations
            .iter()
            .any(|v| v.code == ViolationCode::PanMandatory));

        let args = ValidateArgs {
            answers: path,
            output: OutputFormat::Json,
        };
        assert_eq!(run_validate(&args).unwrap(), 1);
    }

    #[test]
    fn test_gate_one_ignores_later_steps() {
        let dir = tempfile::tempdir().unwrap();
        let path = answers_file(
            &dir,
            r#"{"adharno": "234567890124", "ownername": "Asha Verma",
                "aadhaarDeclaration": true, "organizationType": "5", "hasPan": "no"}"#,
        );
        let verdict = gate_file(&path, 1).unwrap();
        assert!(verdict.is_open());

        let verdict = gate_file(&path, 2).unwrap();
        assert!(!verdict.is_open());

        let args = GateArgs {
            step: 2,
            answers: path,
            output: OutputFormat::Text,
        };
        assert_eq!(run_gate(&args).unwrap(), 1);
    }

    #[test]
    fn test_unknown_step_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = answers_file(&dir, PROPRIETOR);
        assert!(gate_file(&path, 4).is_err());
    }
}
