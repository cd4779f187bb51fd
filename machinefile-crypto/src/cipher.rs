//! Payload decryption using AES-256-GCM.
//!
//! The encrypted payload travels as `base64(ciphertext).base64(nonce).base64(tag)`.
//! The tag length handed to the cipher is the decoded tag's own length, so
//! truncated tags are accepted as long as AES-GCM supports them.
//!
//! Supported lengths are narrower than GCM allows in general: tags must be
//! 12 to 16 bytes and nonces 12 or 16 bytes, because `aes-gcm` fixes both at
//! the type level. Shorter tags (4 to 11 bytes) and other nonce lengths are
//! rejected as malformed.

use crate::error::{DecryptionError, DecryptionResult};
use crate::key::DerivedKey;
use aes_gcm::aead::consts::{U12, U13, U14, U15, U16};
use aes_gcm::aead::generic_array::{ArrayLength, GenericArray};
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, TagSize};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::trace;

/// Separator between the encoded ciphertext, nonce and tag.
pub const BUNDLE_SEPARATOR: char = '.';

/// Standard GCM nonce size in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Extended nonce size in bytes, also accepted by the decryptor.
pub const EXTENDED_NONCE_SIZE: usize = 16;

/// Full-length authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Shortest truncated tag the decryptor accepts.
pub const MIN_TAG_SIZE: usize = 12;

/// The decoded components of an `enc` field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedBundle {
    /// The encrypted license record.
    pub ciphertext: Vec<u8>,
    /// The GCM initialization vector.
    pub nonce: Vec<u8>,
    /// The GCM authentication tag.
    pub tag: Vec<u8>,
}

impl EncryptedBundle {
    /// Splits and decodes an `enc` field.
    ///
    /// # Errors
    ///
    /// Returns [`DecryptionError::Malformed`] unless the input has exactly three
    /// dot-separated parts that each decode as standard base64.
    pub fn parse(encoded: &str) -> DecryptionResult<Self> {
        let parts: Vec<&str> = encoded.split(BUNDLE_SEPARATOR).collect();
        let &[ciphertext, nonce, tag] = parts.as_slice() else {
            return Err(DecryptionError::Malformed);
        };

        let decode = |part: &str| {
            STANDARD
                .decode(part)
                .map_err(|_| DecryptionError::Malformed)
        };

        Ok(Self {
            ciphertext: decode(ciphertext)?,
            nonce: decode(nonce)?,
            tag: decode(tag)?,
        })
    }

    /// Encodes back to the `ciphertext.nonce.tag` form.
    pub fn encode(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            STANDARD.encode(&self.ciphertext),
            STANDARD.encode(&self.nonce),
            STANDARD.encode(&self.tag),
            sep = BUNDLE_SEPARATOR,
        )
    }

    /// Authenticates and decrypts the bundle. No associated data is used.
    ///
    /// # Errors
    ///
    /// Returns [`DecryptionError::Malformed`] for an unsupported nonce or tag
    /// length and [`DecryptionError::Rejected`] if authentication fails.
    pub fn decrypt(&self, key: &DerivedKey) -> DecryptionResult<Vec<u8>> {
        trace!(
            nonce_len = self.nonce.len(),
            tag_len = self.tag.len(),
            "opening encrypted bundle"
        );

        match self.nonce.len() {
            NONCE_SIZE => open_with_nonce::<U12>(key, self),
            EXTENDED_NONCE_SIZE => open_with_nonce::<U16>(key, self),
            _ => Err(DecryptionError::Malformed),
        }
    }
}

/// Parses an `enc` field and decrypts it with the given key.
///
/// # Errors
///
/// See [`EncryptedBundle::parse`] and [`EncryptedBundle::decrypt`].
pub fn decrypt(encoded: &str, key: &DerivedKey) -> DecryptionResult<Vec<u8>> {
    EncryptedBundle::parse(encoded)?.decrypt(key)
}

fn open_with_nonce<N>(key: &DerivedKey, bundle: &EncryptedBundle) -> DecryptionResult<Vec<u8>>
where
    N: ArrayLength<u8>,
{
    match bundle.tag.len() {
        12 => open::<N, U12>(key, bundle),
        13 => open::<N, U13>(key, bundle),
        14 => open::<N, U14>(key, bundle),
        15 => open::<N, U15>(key, bundle),
        TAG_SIZE => open::<N, U16>(key, bundle),
        _ => Err(DecryptionError::Malformed),
    }
}

// Lengths are checked by the callers, so `from_slice` cannot panic here.
fn open<N, T>(key: &DerivedKey, bundle: &EncryptedBundle) -> DecryptionResult<Vec<u8>>
where
    N: ArrayLength<u8>,
    T: TagSize,
    AesGcm<Aes256, N, T>: KeyInit + AeadInPlace,
{
    let cipher = AesGcm::<Aes256, N, T>::new(GenericArray::from_slice(key.as_bytes()));

    let mut buffer = bundle.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(&bundle.nonce),
            &[],
            &mut buffer,
            GenericArray::from_slice(&bundle.tag),
        )
        .map_err(|_| DecryptionError::Rejected)?;

    Ok(buffer)
}
