//! Master key handling.
//!
//! The master key is 32 random bytes.  On disk and in the `MASTER_KEY`
//! environment variable it is stored as 64 hex characters; in memory it
//! lives inside a `MasterKey`, which zeroes itself when dropped.

use aes_gcm::aead::{KeyInit, OsRng};
use aes_gcm::Aes256Gcm;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Result, VaultError};

/// Length of the master key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Length of the hex-encoded master key.
pub const KEY_HEX_LEN: usize = KEY_LEN * 2;

/// A 32-byte master key that zeroes its memory on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Decode a hex-encoded key.
    ///
    /// Anything other than exactly 64 hex characters (after trimming
    /// surrounding whitespace) is rejected as `MasterKeyInvalid`.
    pub fn from_hex(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.len() != KEY_HEX_LEN {
            return Err(VaultError::MasterKeyInvalid);
        }

        let mut bytes = [0u8; KEY_LEN];
        if hex::decode_to_slice(text, &mut bytes).is_err() {
            bytes.zeroize();
            return Err(VaultError::MasterKeyInvalid);
        }
        Ok(Self { bytes })
    }

    /// Generate a fresh key from the OS random number generator.
    pub fn generate() -> Self {
        let key = Aes256Gcm::generate_key(OsRng);
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(key.as_slice());
        Self { bytes }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Hex-encode the key (lowercase, 64 characters).
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.bytes))
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

/// Generate a new hex-encoded master key.
pub fn generate_key() -> Zeroizing<String> {
    MasterKey::generate().to_hex()
}
