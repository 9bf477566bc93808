//! Pluggable encryption backend used by the vault.
//!
//! The vault only ever talks to a `Backend`: hand it plaintext, get back
//! the text that goes into the secrets file, and the other way round.
//! `Aes256GcmBackend` is the default (and only shipped) implementation.

use zeroize::Zeroizing;

use super::encryption::{decrypt_text, encrypt_to_text};
use super::keys::{self, MasterKey};
use crate::errors::{Result, VaultError};

/// Turns serialized documents into stored blobs and back.
pub trait Backend {
    /// Encrypt `plaintext` into the text stored in the secrets file.
    fn encrypt(&self, plaintext: &[u8]) -> Result<String>;

    /// Decrypt a blob produced by `encrypt`.
    fn decrypt(&self, blob: &str) -> Result<Vec<u8>>;
}

/// AES-256-GCM backend keyed by a hex master key.
///
/// A missing or malformed key is accepted at construction time and only
/// reported (as `MasterKeyInvalid`) once `encrypt` or `decrypt` runs, so
/// callers see the same error for "bad key" and "wrong key".
#[derive(Debug)]
pub struct Aes256GcmBackend {
    key: Option<MasterKey>,
}

impl Aes256GcmBackend {
    /// Build a backend from a hex-encoded master key.
    pub fn new(master_key: Option<&str>) -> Self {
        Self {
            key: master_key.and_then(|text| MasterKey::from_hex(text).ok()),
        }
    }

    /// Build a backend from an already decoded key.
    pub fn from_key(key: MasterKey) -> Self {
        Self { key: Some(key) }
    }

    /// Generate a new hex-encoded master key for this backend.
    pub fn generate_master_key() -> Zeroizing<String> {
        keys::generate_key()
    }

    fn key(&self) -> Result<&MasterKey> {
        self.key.as_ref().ok_or(VaultError::MasterKeyInvalid)
    }
}

impl Backend for Aes256GcmBackend {
    fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        encrypt_to_text(self.key()?, plaintext)
    }

    fn decrypt(&self, blob: &str) -> Result<Vec<u8>> {
        decrypt_text(self.key()?, blob)
    }
}

/// Encrypt `plaintext` under a hex key (absent, empty or malformed keys fail).
pub fn encrypt(master_key: Option<&str>, plaintext: &[u8]) -> Result<String> {
    Aes256GcmBackend::new(master_key).encrypt(plaintext)
}

/// Decrypt `blob` under a hex key.
pub fn decrypt(master_key: Option<&str>, blob: &str) -> Result<Vec<u8>> {
    Aes256GcmBackend::new(master_key).decrypt(blob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_roundtrip() {
        let key = Aes256GcmBackend::generate_master_key();
        let backend = Aes256GcmBackend::new(Some(key.as_str()));
        let blob = backend.encrypt(b"hello world").unwrap();
        assert_ne!(blob.as_bytes(), b"hello world");
        assert_eq!(backend.decrypt(&blob).unwrap(), b"hello world");
    }

    #[test]
    fn malformed_key_fails_on_use() {
        let backend = Aes256GcmBackend::new(Some("not-a-key"));
        assert!(matches!(
            backend.encrypt(b"x"),
            Err(VaultError::MasterKeyInvalid)
        ));
    }

    #[test]
    fn free_functions_match_backend() {
        let key = Aes256GcmBackend::generate_master_key();
        let blob = encrypt(Some(key.as_str()), b"data").unwrap();
        assert_eq!(decrypt(Some(key.as_str()), &blob).unwrap(), b"data");
    }
}
