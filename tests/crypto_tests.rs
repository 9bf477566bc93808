//! Integration tests for the secrets-vault crypto module.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use secrets_vault::crypto::encryption;
use secrets_vault::crypto::{decrypt, encrypt, generate_key, MasterKey};
use secrets_vault::VaultError;

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = generate_key();
    let plaintext = b"database-url = \"postgres://localhost/mydb\"\n";

    let blob = encrypt(Some(key.as_str()), plaintext).expect("encrypt should succeed");
    let recovered = decrypt(Some(key.as_str()), &blob).expect("decrypt should succeed");
    assert_eq!(recovered, plaintext);
}

#[test]
fn empty_plaintext_roundtrips() {
    let key = generate_key();
    let blob = encrypt(Some(key.as_str()), b"").unwrap();
    assert!(decrypt(Some(key.as_str()), &blob).unwrap().is_empty());
}

#[test]
fn blob_is_wrapped_base64() {
    let key = generate_key();
    let blob = encrypt(Some(key.as_str()), &[7u8; 500]).unwrap();

    for line in blob.lines() {
        assert!(line.len() <= 80, "line too long: {}", line.len());
    }
    let joined: String = blob.split_whitespace().collect();
    let raw = BASE64.decode(joined).unwrap();
    // nonce || ciphertext || tag
    assert_eq!(raw.len(), 12 + 500 + 16);
}

// ---------------------------------------------------------------------------
// Uniqueness
// ---------------------------------------------------------------------------

#[test]
fn nonces_and_ciphertexts_never_repeat() {
    let key = MasterKey::generate();
    let plaintext = b"same plaintext every time";

    let mut nonces = HashSet::new();
    let mut ciphertexts = HashSet::new();
    for _ in 0..100_000 {
        let raw = encryption::encrypt(&key, plaintext).unwrap();
        let (nonce, body) = raw.split_at(12);
        assert!(nonces.insert(nonce.to_vec()), "nonce reused");
        assert!(ciphertexts.insert(body.to_vec()), "ciphertext repeated");
    }
}

#[test]
fn generated_keys_are_unique_hex() {
    let mut seen = HashSet::new();
    for _ in 0..100_000 {
        let key = generate_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(seen.insert(key.as_str().to_owned()), "duplicate key");
    }
}

// ---------------------------------------------------------------------------
// Bad keys and bad blobs
// ---------------------------------------------------------------------------

#[test]
fn wrong_key_is_rejected() {
    let key = generate_key();
    let other = generate_key();
    let blob = encrypt(Some(key.as_str()), b"secret").unwrap();

    assert!(matches!(
        decrypt(Some(other.as_str()), &blob),
        Err(VaultError::MasterKeyInvalid)
    ));
}

#[test]
fn empty_absent_and_malformed_keys_are_rejected() {
    let key = generate_key();
    let blob = encrypt(Some(key.as_str()), b"secret").unwrap();

    for bad in [None, Some(""), Some("not-hex"), Some("abcd")] {
        assert!(
            matches!(decrypt(bad, &blob), Err(VaultError::MasterKeyInvalid)),
            "{bad:?}"
        );
        assert!(
            matches!(encrypt(bad, b"x"), Err(VaultError::MasterKeyInvalid)),
            "{bad:?}"
        );
    }
}

#[test]
fn tampered_blob_is_rejected() {
    let key = generate_key();
    let blob = encrypt(Some(key.as_str()), b"api-token = \"t0k3n\"").unwrap();

    let mut raw = BASE64.decode(blob.split_whitespace().collect::<String>()).unwrap();
    raw[14] ^= 0x01;
    let tampered = BASE64.encode(raw);

    assert!(matches!(
        decrypt(Some(key.as_str()), &tampered),
        Err(VaultError::MasterKeyInvalid)
    ));
}

#[test]
fn garbage_blob_is_rejected() {
    let key = generate_key();
    for blob in ["!!! not base64 !!!", "AAAA"] {
        assert!(matches!(
            decrypt(Some(key.as_str()), blob),
            Err(VaultError::MasterKeyInvalid)
        ));
    }
}
