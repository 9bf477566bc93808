//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! before decrypting.  No associated data is used.
//!
//! Layout of the raw byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! The text helpers (`encrypt_to_text` / `decrypt_text`) wrap that buffer
//! in base64, split into lines of `LINE_WIDTH` characters so the stored
//! file stays readable.
//!
//! Every failure on the decrypt side (bad key, bad base64, short input,
//! failed tag check) maps to `MasterKeyInvalid`.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::keys::MasterKey;
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Column at which the base64 text is wrapped.
pub const LINE_WIDTH: usize = 80;

/// Encrypt `plaintext` with `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &MasterKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::MasterKeyInvalid)?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::Serialization(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
pub fn decrypt(key: &MasterKey, ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
    // A valid buffer holds at least the nonce and the tag.
    if ciphertext_with_nonce.len() < NONCE_LEN + TAG_LEN {
        return Err(VaultError::MasterKeyInvalid);
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::MasterKeyInvalid)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| VaultError::MasterKeyInvalid)
}

/// Encrypt `plaintext` and encode it as wrapped base64 text.
pub fn encrypt_to_text(key: &MasterKey, plaintext: &[u8]) -> Result<String> {
    let raw = encrypt(key, plaintext)?;
    Ok(wrap_lines(&BASE64.encode(raw), LINE_WIDTH))
}

/// Decode wrapped base64 text and decrypt it.
pub fn decrypt_text(key: &MasterKey, blob: &str) -> Result<Vec<u8>> {
    let compact: String = blob.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let raw = BASE64
        .decode(compact.as_bytes())
        .map_err(|_| VaultError::MasterKeyInvalid)?;
    decrypt(key, &raw)
}

/// Split `text` into newline-terminated lines of at most `width` chars.
///
/// `text` must be ASCII (base64 always is).
fn wrap_lines(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / width + 1);
    for chunk in text.as_bytes().chunks(width) {
        // base64 output is ASCII, so every chunk is valid UTF-8.
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_lines_splits_at_width() {
        let text = "a".repeat(170);
        let wrapped = wrap_lines(&text, 80);
        let lines: Vec<&str> = wrapped.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 80);
        assert_eq!(lines[1].len(), 80);
        assert_eq!(lines[2].len(), 10);
    }

    #[test]
    fn wrap_lines_empty_input() {
        assert_eq!(wrap_lines("", 80), "");
    }

    #[test]
    fn text_blob_lines_never_exceed_width() {
        let key = MasterKey::new([0x11u8; 32]);
        let blob = encrypt_to_text(&key, &[7u8; 500]).unwrap();
        assert!(blob.lines().all(|l| l.len() <= LINE_WIDTH));
        assert_eq!(decrypt_text(&key, &blob).unwrap(), vec![7u8; 500]);
    }

    #[test]
    fn decrypt_text_accepts_unwrapped_blob() {
        let key = MasterKey::new([0x22u8; 32]);
        let raw = encrypt(&key, b"hello world").unwrap();
        let blob = BASE64.encode(raw);
        assert_eq!(decrypt_text(&key, &blob).unwrap(), b"hello world");
    }

    #[test]
    fn decrypt_text_rejects_garbage() {
        let key = MasterKey::new([0x33u8; 32]);
        assert!(matches!(
            decrypt_text(&key, "not base64 !!!"),
            Err(VaultError::MasterKeyInvalid)
        ));
    }

    #[test]
    fn decrypt_rejects_short_buffer() {
        let key = MasterKey::new([0x44u8; 32]);
        assert!(matches!(
            decrypt(&key, &[0u8; NONCE_LEN + TAG_LEN - 1]),
            Err(VaultError::MasterKeyInvalid)
        ));
    }
}
