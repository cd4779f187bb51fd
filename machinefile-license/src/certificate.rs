//! Machine file certificate framing and decoding.
//!
//! A certificate is the standard base64 encoding of a JSON object
//! `{"enc": ..., "sig": ..., "alg": ...}` between a begin and an end marker
//! line. Only the exact marker strings are removed; a missing marker leaves
//! that end of the text untouched, so a certificate with stray whitespace
//! around its markers fails to decode rather than being repaired.

use crate::error::{LicenseResult, MachineFileError};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// Opening marker line, including its newline.
pub const BEGIN_MARKER: &str = "-----BEGIN MACHINE FILE-----\n";

/// Closing marker line, including its newline.
pub const END_MARKER: &str = "-----END MACHINE FILE-----\n";

/// The only algorithm combination understood by this crate.
pub const SUPPORTED_ALGORITHM: &str = "aes-256-gcm+ed25519";

/// Column at which [`Certificate::encode`] wraps the base64 body.
const LINE_WIDTH: usize = 64;

/// A decoded machine file certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// The encrypted bundle, `base64(ciphertext).base64(nonce).base64(tag)`.
    pub enc: String,
    /// Base64 Ed25519 signature over `"machine/" + enc`.
    pub sig: String,
    /// Algorithm identifier.
    pub alg: String,
}

impl Certificate {
    /// Decodes framed certificate text.
    ///
    /// # Errors
    ///
    /// Returns [`MachineFileError::MalformedCertificate`] if the body is not
    /// base64 JSON with string `enc`, `sig` and `alg` fields, and
    /// [`MachineFileError::UnsupportedAlgorithm`] if `alg` is not
    /// [`SUPPORTED_ALGORITHM`].
    pub fn decode(raw: &str) -> LicenseResult<Self> {
        let body: String = strip_framing(raw)
            .chars()
            .filter(|c| !matches!(c, '\n' | '\r'))
            .collect();

        let json = STANDARD.decode(body.as_bytes()).map_err(|e| {
            MachineFileError::MalformedCertificate(format!("invalid base64 body: {e}"))
        })?;

        let certificate: Self = serde_json::from_slice(&json).map_err(|e| {
            MachineFileError::MalformedCertificate(format!("invalid certificate JSON: {e}"))
        })?;

        if certificate.alg != SUPPORTED_ALGORITHM {
            return Err(MachineFileError::UnsupportedAlgorithm);
        }

        Ok(certificate)
    }

    /// Encodes the certificate as framed text with a wrapped base64 body.
    ///
    /// # Errors
    ///
    /// Returns [`MachineFileError::MalformedCertificate`] if the record cannot
    /// be serialized.
    pub fn encode(&self) -> LicenseResult<String> {
        let json = serde_json::to_vec(self).map_err(|e| {
            MachineFileError::MalformedCertificate(format!("cannot serialize certificate: {e}"))
        })?;
        let body = STANDARD.encode(json);

        let mut text = String::with_capacity(
            BEGIN_MARKER.len() + body.len() + body.len() / LINE_WIDTH + 1 + END_MARKER.len(),
        );
        text.push_str(BEGIN_MARKER);
        // Base64 output is ASCII, so byte chunks are valid line boundaries.
        for line in body.as_bytes().chunks(LINE_WIDTH) {
            text.push_str(&String::from_utf8_lossy(line));
            text.push('\n');
        }
        text.push_str(END_MARKER);
        Ok(text)
    }
}

fn strip_framing(raw: &str) -> &str {
    let body = raw.strip_prefix(BEGIN_MARKER).unwrap_or(raw);
    body.strip_suffix(END_MARKER).unwrap_or(body)
}
