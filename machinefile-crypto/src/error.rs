//! Error types for the machine file crypto layer.
//!
//! Each stage separates a malformed input from a cryptographic rejection, but
//! both variants render the same message. Callers that report failures to a
//! user must collapse them into a single outcome so the diagnostic cannot be
//! used to tell tampering apart from a wrong key.

use thiserror::Error;

/// Result type for signature verification.
pub type VerificationResult<T> = Result<T, VerificationError>;

/// Result type for payload decryption.
pub type DecryptionResult<T> = Result<T, DecryptionError>;

/// Ed25519 verification failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Public key, signature encoding, or signature length is invalid.
    #[error("verification failed")]
    Malformed,

    /// The signature does not match the message under the trusted key.
    #[error("verification failed")]
    Rejected,
}

/// AES-256-GCM decryption failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptionError {
    /// The encrypted bundle is not three base64 parts, or a nonce/tag length
    /// is not supported.
    #[error("decryption failed")]
    Malformed,

    /// Authentication failed (wrong key or tampered data).
    #[error("decryption failed")]
    Rejected,
}
