//! # Seed Derivation
//!
//! Derives the 32-byte identity seed from a human-memorable passphrase with
//! Argon2id. The parameters below are protocol constants: both peers must
//! derive identical seeds from identical `(passphrase, salt)` inputs, so
//! they are not tunable per caller. Raising them is a wire-visible change
//! and goes through the metadata schema version.
//!
//! ```text
//! passphrase + 16-byte salt
//!         │
//!         ▼
//! Argon2id (v1.3, t = 2, m = 64 MiB, lanes = 1)
//!         │
//!         ▼
//! 32-byte seed ──► Ed25519 identity keypair (see keys.rs)
//! ```
//!
//! The KDF is intentionally slow and memory-hard; it is the only operation
//! in this crate that may take noticeable wall-clock time. Callers running
//! a reactor should push it onto a worker thread.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

use crate::crypto::{SALT_LEN, SEED_LEN};
use crate::error::{Error, Result};

/// Argon2id pass count (the libsodium `OPSLIMIT_INTERACTIVE` constant)
pub const KDF_OPSLIMIT: u32 = 2;

/// Argon2id memory cost in KiB (64 MiB, `MEMLIMIT_INTERACTIVE`)
pub const KDF_MEMLIMIT_KIB: u32 = 64 * 1024;

/// Argon2id lane / thread count
pub const KDF_LANES: u32 = 1;

/// Longest accepted passphrase in bytes
pub const PASSPHRASE_MAX_LEN: usize = u32::MAX as usize;

/// Derive the 32-byte identity seed from a passphrase and salt
///
/// Deterministic: the same `(passphrase, salt)` pair always yields the same
/// seed, on any platform. The returned buffer is zeroized on drop.
///
/// ## Errors
///
/// - [`Error::PassphraseOutOfRange`] if the passphrase is empty or longer
///   than [`PASSPHRASE_MAX_LEN`]
/// - [`Error::Primitive`] if the KDF itself fails
pub fn derive_seed(passphrase: &[u8], salt: &[u8; SALT_LEN]) -> Result<Zeroizing<[u8; SEED_LEN]>> {
    if passphrase.is_empty() || passphrase.len() > PASSPHRASE_MAX_LEN {
        return Err(Error::PassphraseOutOfRange);
    }

    let params = Params::new(KDF_MEMLIMIT_KIB, KDF_OPSLIMIT, KDF_LANES, Some(SEED_LEN))
        .map_err(|_| Error::Primitive("argon2id parameter rejection"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    tracing::debug!("deriving identity seed with argon2id");

    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    argon2
        .hash_password_into(passphrase, salt, seed.as_mut_slice())
        .map_err(|_| Error::Primitive("argon2id derivation failed"))?;

    Ok(seed)
}

// ============================================================================
// TESTS
// ============================================================================
