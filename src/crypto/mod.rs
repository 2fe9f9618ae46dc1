//! # Cryptography Module
//!
//! All cryptographic primitives used by Parcel Core.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 CRYPTOGRAPHIC ARCHITECTURE                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  passphrase + salt                                              │
//! │        │                                                        │
//! │        ▼  Argon2id (kdf)                                        │
//! │  32-byte seed ──────► Ed25519 identity keypair (keys)           │
//! │                              │                                  │
//! │              ┌───────────────┴──────────────┐                   │
//! │              ▼                              ▼                   │
//! │  detached signatures (signing)   X25519 conversion (keys)       │
//! │  per-frame ephemeral-pk                     │                   │
//! │  commitments                                ▼                   │
//! │                         session key + ChaCha20-Poly1305         │
//! │                         hybrid envelope (envelope)              │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices
//!
//! | Algorithm | Purpose |
//! |-----------|---------|
//! | Ed25519 | Identity, per-frame commitments |
//! | X25519 + BLAKE2b-512 | One-way session keys (kx construction) |
//! | ChaCha20-Poly1305 IETF | Frame confidentiality + integrity |
//! | SHA-512 | Merkle leaves/roots, chunk hashes, key conversion |
//! | Argon2id | Passphrase → seed |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: secret keys, seeds, converted X25519 scalars,
//!    and session keys are wiped on every exit path
//! 2. **Constant-Time Operations**: dalek primitives plus `subtle` for
//!    hash/root comparison
//! 3. **Secure Random**: `rand::rngs::OsRng` wherever randomness is drawn
//! 4. **No Nonce Reuse**: nonces are caller-supplied and must be unique per
//!    session key

pub mod envelope;
pub mod kdf;
mod keys;
mod signing;

use sha2::{Digest, Sha512};

pub use envelope::{decrypt, encrypt, generate_nonce};
pub use kdf::{derive_seed, PASSPHRASE_MAX_LEN};
pub use keys::{Identity, PublicKey};
pub use signing::{sign, verify, Signature};

/// SHA-512 digest length in bytes; the hash size of the whole protocol
pub const HASH_LEN: usize = 64;

/// Ed25519 public key length in bytes
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 secret key length in bytes (`seed ‖ public_key` encoding)
pub const SECRET_KEY_LEN: usize = 64;

/// Ed25519 detached signature length in bytes
pub const SIGNATURE_LEN: usize = 64;

/// X25519 key length in bytes (secret and public alike)
pub const EXCHANGE_KEY_LEN: usize = 32;

/// Session key length in bytes
pub const SESSION_KEY_LEN: usize = 32;

/// ChaCha20-Poly1305 IETF nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// ChaCha20-Poly1305 authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Identity seed length in bytes
pub const SEED_LEN: usize = 32;

/// KDF salt length in bytes
pub const SALT_LEN: usize = 16;

/// SHA-512 of `data`
pub fn sha512(data: &[u8]) -> [u8; HASH_LEN] {
    Sha512::digest(data).into()
}

// ============================================================================
// TESTS
// ============================================================================
