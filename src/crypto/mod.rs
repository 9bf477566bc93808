//! Cryptographic primitives for the secrets vault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - The `MasterKey` type and key generation (`keys`)
//! - The `Backend` trait the vault encrypts through (`backend`)
//! - Master key files and key resolution (`keyfile`)

pub mod backend;
pub mod encryption;
pub mod keyfile;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{Backend, Aes256GcmBackend, generate_key, ...};
pub use backend::{decrypt, encrypt, Aes256GcmBackend, Backend};
pub use keyfile::{read_key_file, resolve_master_key, write_key_file};
pub use keys::{generate_key, MasterKey};
