//! Ed25519 verification of the machine file's encrypted bundle.
//!
//! The signed message is `"machine/" + enc`, where `enc` is the still-encoded
//! bundle string exactly as it appears in the certificate. Verification is
//! therefore independent of the license key and fingerprint used to decrypt.

use crate::error::{VerificationError, VerificationResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Prefix prepended to the encoded bundle to form the signed message.
pub const MESSAGE_PREFIX: &str = "machine/";

/// Size of an Ed25519 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Builds the message that the issuer signed for a given encoded bundle.
pub fn signing_message(enc: &str) -> Vec<u8> {
    let mut message = Vec::with_capacity(MESSAGE_PREFIX.len() + enc.len());
    message.extend_from_slice(MESSAGE_PREFIX.as_bytes());
    message.extend_from_slice(enc.as_bytes());
    message
}

/// Verifies machine file signatures against a trusted Ed25519 public key.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    /// Creates a verifier for an already-parsed public key.
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Creates a verifier from raw 32-byte public key material.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::Malformed`] if the bytes are not a valid
    /// curve point.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_SIZE]) -> VerificationResult<Self> {
        VerifyingKey::from_bytes(bytes)
            .map(Self::new)
            .map_err(|_| VerificationError::Malformed)
    }

    /// Creates a verifier from a hex-encoded public key.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::Malformed`] if the string is not hex, is not
    /// 32 bytes long, or is not a valid public key.
    pub fn from_hex(public_key_hex: &str) -> VerificationResult<Self> {
        let bytes = hex::decode(public_key_hex).map_err(|_| VerificationError::Malformed)?;
        let bytes: [u8; PUBLIC_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| VerificationError::Malformed)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the raw public key bytes.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.key.to_bytes()
    }

    /// Verifies a base64 signature over `"machine/" + enc`.
    ///
    /// # Errors
    ///
    /// Returns [`VerificationError::Malformed`] if the signature is not valid
    /// base64 or not 64 bytes, and [`VerificationError::Rejected`] if it does
    /// not verify.
    pub fn verify(&self, enc: &str, sig: &str) -> VerificationResult<()> {
        let sig_bytes = STANDARD
            .decode(sig)
            .map_err(|_| VerificationError::Malformed)?;
        let signature =
            Signature::from_slice(&sig_bytes).map_err(|_| VerificationError::Malformed)?;

        self.key
            .verify(&signing_message(enc), &signature)
            .map_err(|_| VerificationError::Rejected)
    }
}
