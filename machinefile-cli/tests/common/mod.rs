//! Shared test helpers for command-line tests.

#![allow(dead_code)]

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::Aes256Gcm;
use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};
use std::io::Write;
use tempfile::NamedTempFile;

pub const LICENSE_KEY: &str = "9A7F2C-18E0B3-4D5C6A-77B1E2-90AF3D-V3";
pub const FINGERPRINT: &str = "0f3b5d9e2a4c6e8f1b3d5f7a9c1e3b5d";

/// Returns a fixed-seed signing key and its hex public key.
pub fn test_keypair() -> (SigningKey, String) {
    let signing_key = SigningKey::from_bytes(&[7u8; 32]);
    let public_hex = hex::encode(signing_key.verifying_key().to_bytes());
    (signing_key, public_hex)
}

/// Returns the public key of an unrelated key pair.
pub fn other_public_key() -> String {
    hex::encode(SigningKey::from_bytes(&[8u8; 32]).verifying_key().to_bytes())
}

pub fn license_record() -> serde_json::Value {
    serde_json::json!({
        "data": {
            "type": "licenses",
            "attributes": { "name": "Pro", "maxMachines": 3 }
        },
        "meta": { "issued": "2024-06-01T00:00:00.000Z" }
    })
}

/// Builds framed certificate text with the given algorithm identifier.
pub fn certificate_with_alg(alg: &str) -> String {
    let key: [u8; 32] = Sha256::digest(format!("{LICENSE_KEY}{FINGERPRINT}").as_bytes()).into();
    let nonce = [0x24u8; 12];

    let cipher = Aes256Gcm::new(GenericArray::from_slice(&key));
    let mut buffer = license_record().to_string().into_bytes();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&nonce), &[], &mut buffer)
        .unwrap();
    let enc = format!(
        "{}.{}.{}",
        STANDARD.encode(&buffer),
        STANDARD.encode(nonce),
        STANDARD.encode(tag)
    );

    let (signing_key, _) = test_keypair();
    let sig = STANDARD.encode(signing_key.sign(format!("machine/{enc}").as_bytes()).to_bytes());

    let body = serde_json::json!({ "enc": enc, "sig": sig, "alg": alg });
    format!(
        "-----BEGIN MACHINE FILE-----\n{}\n-----END MACHINE FILE-----\n",
        STANDARD.encode(body.to_string())
    )
}

pub fn certificate() -> String {
    certificate_with_alg("aes-256-gcm+ed25519")
}

/// Writes `contents` to a temporary file that lives as long as the handle.
pub fn write_temp(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}
