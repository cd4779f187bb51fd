//! Cryptographic primitives for machine file license certificates.
//!
//! A machine file carries an AES-256-GCM encrypted license record together with
//! an Ed25519 signature over the encoded ciphertext bundle. This crate provides
//! the three primitives needed to open one:
//! - [`SignatureVerifier`]: Ed25519 verification of `"machine/" + enc`
//! - [`derive_key`]: `SHA-256(license_key || fingerprint)` key derivation
//! - [`decrypt`]: splitting, decoding and authenticated decryption of `enc`
//!
//! Errors are deliberately coarse; see [`VerificationError`] and
//! [`DecryptionError`].

mod cipher;
mod error;
mod key;
mod signature;

pub use cipher::{
    decrypt, EncryptedBundle, BUNDLE_SEPARATOR, EXTENDED_NONCE_SIZE, MIN_TAG_SIZE, NONCE_SIZE,
    TAG_SIZE,
};
pub use error::{DecryptionError, DecryptionResult, VerificationError, VerificationResult};
pub use key::{derive_key, DerivedKey, KEY_SIZE};
pub use signature::{signing_message, SignatureVerifier, MESSAGE_PREFIX, PUBLIC_KEY_SIZE};
