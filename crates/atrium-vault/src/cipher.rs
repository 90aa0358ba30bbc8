//! AEAD credential cipher
//!
//! AES-256-GCM with a key derived once from the configured secret.
//! Encoded payload layout: base64(`iv[12] || tag[16] || ciphertext`).
//! Changing this byte layout is a breaking format change requiring
//! re-encryption of all stored records.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

use atrium_const::{MIN_ENCRYPTION_SECRET_LEN, MIN_PLAUSIBLE_KEY_LEN, NONCE_LEN, TAG_LEN};

#[derive(Debug, Error)]
pub enum VaultError {
    /// The vault cannot be constructed from this configuration. Fatal at
    /// boot; retrying cannot fix a bad secret.
    #[error("vault configuration error: {0}")]
    Configuration(String),

    /// The payload failed authentication or does not match the expected
    /// layout. Signals tampering or a key mismatch; never ignored.
    #[error("invalid ciphertext")]
    InvalidCiphertext,
}

/// Encrypts and decrypts credential strings with a process-lifetime key.
pub struct KeyVault {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for KeyVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyVault").finish_non_exhaustive()
    }
}

impl KeyVault {
    /// Derive the AEAD key from the configured secret.
    ///
    /// The key is a one-way hash of the secret, not the raw secret, and
    /// is derived once and reused for the process lifetime.
    pub fn new(secret: &str) -> Result<Self, VaultError> {
        if secret.len() < MIN_ENCRYPTION_SECRET_LEN {
            return Err(VaultError::Configuration(format!(
                "encryption secret must be at least {MIN_ENCRYPTION_SECRET_LEN} characters"
            )));
        }
        let digest = Sha256::digest(secret.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(&digest);
        Ok(Self { cipher: Aes256Gcm::new(key) })
    }

    /// Encrypt a plaintext credential.
    ///
    /// A fresh random 12-byte nonce is drawn inside every call; callers
    /// cannot supply one, so nonce reuse under this key cannot happen by
    /// construction.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| VaultError::InvalidCiphertext)?;

        // aes-gcm appends the tag to the ciphertext; the wire layout puts
        // it between the nonce and the ciphertext.
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);
        let mut raw = Vec::with_capacity(NONCE_LEN + TAG_LEN + ciphertext.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(tag);
        raw.extend_from_slice(ciphertext);
        Ok(BASE64.encode(raw))
    }

    /// Decrypt an encoded credential into a zeroized buffer.
    pub fn decrypt(&self, encoded: &str) -> Result<Zeroizing<String>, VaultError> {
        let raw = BASE64.decode(encoded).map_err(|_| VaultError::InvalidCiphertext)?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(VaultError::InvalidCiphertext);
        }
        let (nonce, rest) = raw.split_at(NONCE_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);

        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_LEN);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), sealed.as_ref())
            .map_err(|_| VaultError::InvalidCiphertext)?;
        String::from_utf8(plaintext)
            .map(Zeroizing::new)
            .map_err(|_| VaultError::InvalidCiphertext)
    }

    /// Whether a decrypted key looks usable at all.
    ///
    /// Rejects empty strings, placeholder/redacted-looking strings, and
    /// strings short enough to be obviously wrong, before any network
    /// round trip is spent on them.
    pub fn is_plausible(candidate: &str) -> bool {
        !candidate.is_empty()
            && candidate.len() > MIN_PLAUSIBLE_KEY_LEN
            && !candidate.contains("your-")
            && !candidate.contains("********")
    }
}
