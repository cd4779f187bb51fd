//! Trust anchor configuration.
//!
//! Where the public key comes from (environment, file, secret store) is up to
//! the embedding application; this crate only needs the hex string.

use crate::error::{LicenseResult, MachineFileError};
use machinefile_crypto::SignatureVerifier;
use serde::{Deserialize, Serialize};

/// Configuration for machine file verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierConfig {
    /// Hex-encoded Ed25519 verifying key of the certificate issuer.
    pub public_key_hex: String,
}

impl VerifierConfig {
    /// Creates a configuration from a hex-encoded public key.
    pub fn new(public_key_hex: impl Into<String>) -> Self {
        Self {
            public_key_hex: public_key_hex.into(),
        }
    }

    /// Builds the signature verifier for the configured key.
    ///
    /// # Errors
    ///
    /// An unusable key is reported as [`MachineFileError::VerificationFailed`],
    /// the same outcome as a bad signature.
    pub fn verifier(&self) -> LicenseResult<SignatureVerifier> {
        SignatureVerifier::from_hex(&self.public_key_hex).map_err(MachineFileError::from)
    }
}
