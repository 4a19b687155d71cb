//! Authenticated encryption of persisted project files.
//!
//! - AES-256-GCM with a 16-byte random iv per save
//! - additional authenticated data fixed to [`AAD`]
//! - detached 16-byte tag, all parts hex-encoded in an [`Envelope`]
//!
//! The key is derived once from a secret with PBKDF2-HMAC-SHA256 and wiped on drop.

use std::fmt;

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{
    AeadInPlace,
    KeyInit,
};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{
    Deserialize,
    Serialize,
};
use sha2::Sha256;
use thiserror::Error;
use zeroize::{
    Zeroize,
    ZeroizeOnDrop,
};

/// AES-256-GCM with a 128-bit nonce.
type Cipher = AesGcm<Aes256, U16>;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;
pub const TAG_LEN: usize = 16;

/// Context string bound to every ciphertext.
pub const AAD: &[u8] = b"metadata";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed")]
    Encrypt,

    /// Wrong key, or the data was modified.
    #[error("Decryption failed: authentication tag mismatch")]
    Decrypt,

    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),
}

/// On-disk form of an encrypted payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub iv: String,
    pub auth_tag: String,
    pub encrypted_data: String,
}

/// Key material for [`Envelope`] encryption, built once at start-up and shared.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionContext {
    key: [u8; KEY_LEN],
}

impl fmt::Debug for EncryptionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionContext").field("key", &"***").finish()
    }
}

impl EncryptionContext {
    /// Derives the key from a secret.
    ///
    /// # Errors
    /// `KeyDerivation` for an empty secret or zero iterations.
    pub fn from_passphrase(secret: &[u8], salt: &[u8], iterations: u32) -> Result<Self, CryptoError> {
        if secret.is_empty() {
            return Err(CryptoError::KeyDerivation("secret is empty".to_string()));
        }
        if iterations == 0 {
            return Err(CryptoError::KeyDerivation("iteration count must be positive".to_string()));
        }
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(secret, salt, iterations, &mut key);
        let context = Self { key };
        key.zeroize();
        Ok(context)
    }

    #[must_use]
    pub const fn from_key(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// AES-256-GCM instance for the derived key.
    fn cipher(&self) -> Cipher {
        Cipher::new(GenericArray::from_slice(&self.key))
    }

    /// Encrypts `plaintext` under a fresh random iv.
    ///
    /// # Errors
    /// `Encrypt` when the cipher rejects the input.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Envelope, CryptoError> {
        let mut iv = [0u8; IV_LEN];
        rand::rngs::OsRng.fill_bytes(&mut iv);

        let mut buffer = plaintext.to_vec();
        let tag = self
            .cipher()
            .encrypt_in_place_detached(GenericArray::from_slice(&iv), AAD, &mut buffer)
            .map_err(|_| CryptoError::Encrypt)?;

        Ok(Envelope {
            iv: hex::encode(iv),
            auth_tag: hex::encode(tag),
            encrypted_data: hex::encode(buffer),
        })
    }

    /// Verifies and decrypts an envelope.
    ///
    /// # Errors
    /// - `InvalidEnvelope` for malformed hex or wrong iv/tag lengths
    /// - `Decrypt` when authentication fails
    pub fn decrypt(&self, envelope: &Envelope) -> Result<Vec<u8>, CryptoError> {
        let iv = decode_fixed::<IV_LEN>("iv", &envelope.iv)?;
        let tag = decode_fixed::<TAG_LEN>("authTag", &envelope.auth_tag)?;
        let mut buffer = hex::decode(&envelope.encrypted_data)
            .map_err(|e| CryptoError::InvalidEnvelope(format!("encryptedData: {e}")))?;

        self.cipher()
            .decrypt_in_place_detached(
                GenericArray::from_slice(&iv),
                AAD,
                &mut buffer,
                GenericArray::from_slice(&tag),
            )
            .map_err(|_| CryptoError::Decrypt)?;
        Ok(buffer)
    }
}

/// Hex-decodes an envelope field of exactly `N` bytes.
fn decode_fixed<const N: usize>(field: &str, value: &str) -> Result<[u8; N], CryptoError> {
    let bytes =
        hex::decode(value).map_err(|e| CryptoError::InvalidEnvelope(format!("{field}: {e}")))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        CryptoError::InvalidEnvelope(format!("{field}: expected {N} bytes, got {}", bytes.len()))
    })
}
