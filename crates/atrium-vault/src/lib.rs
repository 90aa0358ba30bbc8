//! # Atrium Vault - Credential Vault
//!
//! AEAD encryption for per-user provider API keys at rest, plus the
//! credential record store seam. Plaintext keys exist only transiently in
//! zeroized buffers during a resolution call and are never logged.

pub mod cipher;
pub mod store;

pub use cipher::{KeyVault, VaultError};
pub use store::{CredentialStore, MemoryCredentialStore};
