//! Offline verification of machine file license certificates.
//!
//! A machine file binds a license record to a single machine. Opening one
//! takes two independent checks:
//! - **Authenticity**: the encoded bundle must carry a valid Ed25519 signature
//!   from the issuer's key, over `"machine/" + enc`
//! - **Possession**: the bundle must decrypt under
//!   `SHA-256(license_key || fingerprint)` with AES-256-GCM
//!
//! A certificate can pass the first check and still fail the second when the
//! caller holds the wrong license key or runs on another machine.
//!
//! # Certificate Format
//!
//! ```text
//! -----BEGIN MACHINE FILE-----
//! base64({"enc": "<ct>.<nonce>.<tag>", "sig": "<sig>", "alg": "aes-256-gcm+ed25519"})
//! -----END MACHINE FILE-----
//! ```
//!
//! # Failure Reporting
//!
//! Verification and decryption failures are reported as one outcome each, no
//! matter whether the input was malformed or cryptographically wrong.

mod certificate;
mod config;
mod error;
mod pipeline;

pub use certificate::{Certificate, BEGIN_MARKER, END_MARKER, SUPPORTED_ALGORITHM};
pub use config::VerifierConfig;
pub use error::{LicenseResult, MachineFileError};
pub use pipeline::{
    AesGcmDecryptor, BundleDecryptor, BundleVerifier, LicenseRecord, Pipeline, Stage,
};
