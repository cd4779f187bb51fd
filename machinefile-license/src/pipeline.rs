//! The machine file verification pipeline.
//!
//! Stages run strictly in order: decode, verify, derive key, decrypt. Each
//! stage only runs if the previous one succeeded, and the first failure ends
//! the run. Nothing is retried; every stage is a pure function of its inputs.

use crate::certificate::Certificate;
use crate::config::VerifierConfig;
use crate::error::{LicenseResult, MachineFileError};
use machinefile_crypto::{
    derive_key, DecryptionResult, DerivedKey, SignatureVerifier, VerificationResult,
};
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

/// Authenticates the encoded bundle of a certificate.
pub trait BundleVerifier: Send + Sync {
    /// Checks `sig` against `enc`.
    fn verify(&self, enc: &str, sig: &str) -> VerificationResult<()>;
}

impl BundleVerifier for SignatureVerifier {
    fn verify(&self, enc: &str, sig: &str) -> VerificationResult<()> {
        SignatureVerifier::verify(self, enc, sig)
    }
}

/// Parses the configured key inside the Verify stage, so an unusable key
/// is only reported once the certificate has decoded and passed the
/// algorithm gate.
impl BundleVerifier for VerifierConfig {
    fn verify(&self, enc: &str, sig: &str) -> VerificationResult<()> {
        SignatureVerifier::from_hex(&self.public_key_hex)?.verify(enc, sig)
    }
}

/// Opens the encoded bundle of a certificate.
pub trait BundleDecryptor: Send + Sync {
    /// Decrypts `enc` with `key`, returning the plaintext record bytes.
    fn decrypt(&self, enc: &str, key: &DerivedKey) -> DecryptionResult<Vec<u8>>;
}

/// AES-256-GCM decryptor for `aes-256-gcm+ed25519` certificates.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmDecryptor;

impl BundleDecryptor for AesGcmDecryptor {
    fn decrypt(&self, enc: &str, key: &DerivedKey) -> DecryptionResult<Vec<u8>> {
        machinefile_crypto::decrypt(enc, key)
    }
}

/// A pipeline stage that has just completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The certificate was unframed and parsed, and its algorithm is supported.
    Decoded,
    /// The bundle signature verified against the trusted key.
    Verified,
    /// The decryption key was derived.
    KeyDerived,
    /// The bundle decrypted and authenticated.
    Decrypted,
}

/// The decrypted license record.
///
/// Any JSON value is accepted; the record is displayed, not interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseRecord(Value);

impl LicenseRecord {
    /// Parses decrypted plaintext as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`MachineFileError::MalformedCertificate`] if the plaintext is
    /// not UTF-8 JSON.
    pub fn from_plaintext(plaintext: &[u8]) -> LicenseResult<Self> {
        let text = std::str::from_utf8(plaintext).map_err(|_| {
            MachineFileError::MalformedCertificate("license record is not UTF-8".to_string())
        })?;
        serde_json::from_str(text).map(Self).map_err(|_| {
            MachineFileError::MalformedCertificate("license record is not valid JSON".to_string())
        })
    }

    /// Returns the record as a JSON value.
    #[must_use]
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consumes the record, returning the JSON value.
    #[must_use]
    pub fn into_json(self) -> Value {
        self.0
    }

    /// Serializes the record with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`MachineFileError::MalformedCertificate`] if serialization fails.
    pub fn to_pretty_string(&self) -> LicenseResult<String> {
        serde_json::to_string_pretty(&self.0).map_err(|e| {
            MachineFileError::MalformedCertificate(format!("cannot serialize license record: {e}"))
        })
    }
}

/// Verifies and decrypts machine files against one trusted key.
///
/// The pipeline holds no mutable state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct Pipeline<V = SignatureVerifier, D = AesGcmDecryptor> {
    verifier: V,
    decryptor: D,
}

impl Pipeline {
    /// Creates a pipeline using Ed25519 verification and AES-256-GCM decryption.
    pub fn new(verifier: SignatureVerifier) -> Self {
        Self::with_parts(verifier, AesGcmDecryptor)
    }

    /// Creates a pipeline from a hex-encoded issuer public key.
    ///
    /// # Errors
    ///
    /// Returns [`MachineFileError::VerificationFailed`] if the key is unusable.
    pub fn from_public_key_hex(public_key_hex: &str) -> LicenseResult<Self> {
        Self::from_config(&VerifierConfig::new(public_key_hex))
    }

    /// Creates a pipeline from configuration, parsing the key up front.
    ///
    /// # Errors
    ///
    /// Returns [`MachineFileError::VerificationFailed`] if the key is unusable.
    pub fn from_config(config: &VerifierConfig) -> LicenseResult<Self> {
        config.verifier().map(Self::new)
    }
}

impl Pipeline<VerifierConfig> {
    /// Creates a pipeline that parses the configured key in the Verify stage.
    ///
    /// Certificates that are malformed or use an unsupported algorithm are
    /// reported as such even when the key itself is unusable.
    pub fn deferred(config: VerifierConfig) -> Self {
        Self::with_parts(config, AesGcmDecryptor)
    }
}

impl<V: BundleVerifier, D: BundleDecryptor> Pipeline<V, D> {
    /// Creates a pipeline from explicit stage implementations.
    pub fn with_parts(verifier: V, decryptor: D) -> Self {
        Self {
            verifier,
            decryptor,
        }
    }

    /// Runs the full pipeline over certificate text.
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that fails.
    pub fn run(
        &self,
        certificate: &str,
        license_key: &str,
        fingerprint: &str,
    ) -> LicenseResult<LicenseRecord> {
        self.run_observed(certificate, license_key, fingerprint, |_| {})
    }

    /// Runs the full pipeline, reporting each completed stage to `observe`.
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that fails. Stages after the
    /// failing one never run and are never reported.
    pub fn run_observed(
        &self,
        certificate: &str,
        license_key: &str,
        fingerprint: &str,
        mut observe: impl FnMut(Stage),
    ) -> LicenseResult<LicenseRecord> {
        let certificate = Certificate::decode(certificate).inspect_err(|err| {
            debug!(stage = "decode", "stage failed: {err}");
        })?;
        debug!("certificate decoded");
        observe(Stage::Decoded);

        self.verifier
            .verify(&certificate.enc, &certificate.sig)
            .map_err(|_| {
                debug!(stage = "verify", "stage failed");
                MachineFileError::VerificationFailed
            })?;
        debug!("signature verified");
        observe(Stage::Verified);

        let key = derive_key(license_key, fingerprint);
        observe(Stage::KeyDerived);

        let plaintext = self
            .decryptor
            .decrypt(&certificate.enc, &key)
            .map(Zeroizing::new)
            .map_err(|_| {
                debug!(stage = "decrypt", "stage failed");
                MachineFileError::DecryptionFailed
            })?;
        drop(key);
        debug!(len = plaintext.len(), "bundle decrypted");
        observe(Stage::Decrypted);

        LicenseRecord::from_plaintext(&plaintext)
    }

    /// Returns the verifier stage.
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Returns the decryptor stage.
    pub fn decryptor(&self) -> &D {
        &self.decryptor
    }
}
