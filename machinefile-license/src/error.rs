//! Error types for machine file verification.
//!
//! Verification and decryption failures carry no detail: whatever went wrong
//! inside those stages, the caller sees one outcome per stage.

use machinefile_crypto::{DecryptionError, VerificationError};
use thiserror::Error;

/// Machine file errors.
#[derive(Debug, Error)]
pub enum MachineFileError {
    /// The certificate could not be read.
    #[error("path does not exist (or permission was denied)")]
    InputUnavailable(#[from] std::io::Error),

    /// Framing, base64, JSON or field-shape violation.
    #[error("malformed certificate: {0}")]
    MalformedCertificate(String),

    /// The `alg` field is not the single supported value.
    #[error("algorithm is not supported")]
    UnsupportedAlgorithm,

    /// Signature check failed for any reason.
    #[error("verification failed")]
    VerificationFailed,

    /// Authenticated decryption failed for any reason.
    #[error("decryption failed")]
    DecryptionFailed,
}

impl MachineFileError {
    /// Returns the process exit code reported for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InputUnavailable(_) => 3,
            Self::MalformedCertificate(_) => 4,
            Self::UnsupportedAlgorithm => 5,
            Self::VerificationFailed => 6,
            Self::DecryptionFailed => 7,
        }
    }
}

impl From<VerificationError> for MachineFileError {
    fn from(_: VerificationError) -> Self {
        Self::VerificationFailed
    }
}

impl From<DecryptionError> for MachineFileError {
    fn from(_: DecryptionError) -> Self {
        Self::DecryptionFailed
    }
}

/// Result type for machine file operations.
pub type LicenseResult<T> = Result<T, MachineFileError>;
