//! Shared test helpers for machine file tests.

#![allow(dead_code)]

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::Aes256Gcm;
use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signer, SigningKey};
use machinefile_crypto::{
    DecryptionResult, DerivedKey, SignatureVerifier, VerificationResult,
};
use machinefile_license::{AesGcmDecryptor, BundleDecryptor, BundleVerifier};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const LICENSE_KEY: &str = "C1B6DE-39A6E3-DE1A9E-F7A2B8-2A6E8C-V3";
pub const FINGERPRINT: &str = "4e4b6a2c9f1d0e7a5b3c8d2f6a1e9b7c";
pub const ALGORITHM: &str = "aes-256-gcm+ed25519";

const BEGIN: &str = "-----BEGIN MACHINE FILE-----\n";
const END: &str = "-----END MACHINE FILE-----\n";

/// Returns a deterministic Ed25519 key pair from a fixed seed, with the
/// public key hex-encoded.
pub fn test_keypair() -> (SigningKey, String) {
    keypair_from_seed(1)
}

/// Returns an unrelated key pair.
pub fn other_keypair() -> (SigningKey, String) {
    keypair_from_seed(2)
}

fn keypair_from_seed(fill: u8) -> (SigningKey, String) {
    let seed: [u8; 32] = std::array::from_fn(|i| fill.wrapping_add(i as u8));
    let signing_key = SigningKey::from_bytes(&seed);
    let public_hex = hex::encode(signing_key.verifying_key().to_bytes());
    (signing_key, public_hex)
}

/// The license record encrypted into fixture certificates.
pub fn license_record() -> serde_json::Value {
    serde_json::json!({
        "meta": {
            "issued": "2024-01-01T00:00:00.000Z",
            "expiry": "2025-01-01T00:00:00.000Z",
            "ttl": 31556952
        },
        "data": {
            "type": "machines",
            "id": "4d6e2e6b-5bd6-4b6a-8a3e-0c2f2a2d9f11",
            "attributes": {
                "fingerprint": FINGERPRINT,
                "name": "build-server",
                "cores": 8
            }
        },
        "included": []
    })
}

/// Encrypts `plaintext` under `SHA-256(license || fingerprint)`, returning the
/// `ciphertext.nonce.tag` string.
pub fn seal_enc(license: &str, fingerprint: &str, plaintext: &[u8]) -> String {
    let key: [u8; 32] = Sha256::digest(format!("{license}{fingerprint}").as_bytes()).into();

    let mut nonce = [0u8; 12];
    rand::rngs::OsRng.fill_bytes(&mut nonce);

    let cipher = Aes256Gcm::new(GenericArray::from_slice(&key));
    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&nonce), &[], &mut buffer)
        .unwrap();

    format!(
        "{}.{}.{}",
        STANDARD.encode(&buffer),
        STANDARD.encode(nonce),
        STANDARD.encode(tag)
    )
}

/// Signs `"machine/" + enc`, returning the base64 signature.
pub fn sign_enc(signing_key: &SigningKey, enc: &str) -> String {
    let signature = signing_key.sign(format!("machine/{enc}").as_bytes());
    STANDARD.encode(signature.to_bytes())
}

/// Frames a certificate body built from the three fields.
pub fn frame(enc: &str, sig: &str, alg: &str) -> String {
    let body = serde_json::json!({ "enc": enc, "sig": sig, "alg": alg });
    frame_json(&body.to_string())
}

/// Frames an arbitrary JSON body.
pub fn frame_json(json: &str) -> String {
    format!("{BEGIN}{}\n{END}", STANDARD.encode(json.as_bytes()))
}

/// Builds a complete, valid certificate for the given secrets and record.
pub fn make_certificate(
    signing_key: &SigningKey,
    license: &str,
    fingerprint: &str,
    record: &serde_json::Value,
) -> String {
    let enc = seal_enc(license, fingerprint, record.to_string().as_bytes());
    let sig = sign_enc(signing_key, &enc);
    frame(&enc, &sig, ALGORITHM)
}

/// Builds the standard fixture certificate.
pub fn standard_certificate() -> String {
    let (sk, _) = test_keypair();
    make_certificate(&sk, LICENSE_KEY, FINGERPRINT, &license_record())
}

/// Flips the low bit of the byte at `index`.
pub fn flip_byte(value: &str, index: usize) -> String {
    let mut bytes = value.as_bytes().to_vec();
    bytes[index] ^= 0x01;
    String::from_utf8(bytes).unwrap()
}

/// Verifier that counts calls before delegating.
pub struct CountingVerifier {
    inner: SignatureVerifier,
    calls: AtomicUsize,
}

impl CountingVerifier {
    pub fn new(public_key_hex: &str) -> Self {
        Self {
            inner: SignatureVerifier::from_hex(public_key_hex).unwrap(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BundleVerifier for CountingVerifier {
    fn verify(&self, enc: &str, sig: &str) -> VerificationResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(enc, sig)
    }
}

/// Decryptor that counts calls before delegating to AES-256-GCM.
#[derive(Default)]
pub struct CountingDecryptor {
    calls: AtomicUsize,
}

impl CountingDecryptor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BundleDecryptor for CountingDecryptor {
    fn decrypt(&self, enc: &str, key: &DerivedKey) -> DecryptionResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        AesGcmDecryptor.decrypt(enc, key)
    }
}

/// Stage implementations that must never run.
pub struct UnreachableVerifier;

impl BundleVerifier for UnreachableVerifier {
    fn verify(&self, _enc: &str, _sig: &str) -> VerificationResult<()> {
        panic!("verifier must not be invoked");
    }
}

pub struct UnreachableDecryptor;

impl BundleDecryptor for UnreachableDecryptor {
    fn decrypt(&self, _enc: &str, _key: &DerivedKey) -> DecryptionResult<Vec<u8>> {
        panic!("decryptor must not be invoked");
    }
}
