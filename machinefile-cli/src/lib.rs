//! Command-line front end for machine file verification.
//!
//! Reads a machine file, verifies it against the issuer's public key, decrypts
//! it with the license key and machine fingerprint, and prints the license
//! record. The binary in `main.rs` only parses arguments, installs logging and
//! maps errors to exit codes.

mod fingerprint;
mod input;

use anyhow::Result;
use machinefile_license::{Pipeline, Stage, VerifierConfig};
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub use fingerprint::{default_fingerprint, fingerprint_from, machine_identifier};
pub use input::read_certificate;

/// Inputs for one verification run.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Path to the machine file.
    pub path: &'a Path,
    /// License key used to derive the decryption key.
    pub license_key: &'a str,
    /// Machine fingerprint used to derive the decryption key.
    pub fingerprint: &'a str,
    /// Hex-encoded Ed25519 public key of the issuer.
    pub public_key_hex: &'a str,
}

/// Returns the progress notice printed after a stage, if any.
#[must_use]
pub fn stage_notice(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Verified => Some("[info] verification successful!"),
        Stage::Decrypted => Some("[info] decryption successful!"),
        Stage::Decoded | Stage::KeyDerived => None,
    }
}

/// Runs the pipeline and writes progress notices and the record to `out`.
///
/// Notices for stages that completed are written even when a later stage
/// fails. Nothing derived from the license key is written on failure.
///
/// # Errors
///
/// Returns the [`machinefile_license::MachineFileError`] of the failing stage,
/// or an I/O error if `out` cannot be written.
pub fn execute(invocation: &Invocation<'_>, out: &mut impl Write) -> Result<()> {
    debug!(path = %invocation.path.display(), "reading machine file");
    let certificate = read_certificate(invocation.path)?;

    let pipeline = Pipeline::deferred(VerifierConfig::new(invocation.public_key_hex));

    let mut notices = Vec::new();
    let result = pipeline.run_observed(
        &certificate,
        invocation.license_key,
        invocation.fingerprint,
        |stage| notices.extend(stage_notice(stage)),
    );

    for notice in notices {
        writeln!(out, "{notice}")?;
    }

    let record = result?;
    writeln!(out, "{}", record.to_pretty_string()?)?;
    out.flush()?;
    Ok(())
}
