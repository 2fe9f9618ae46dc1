//! # Error Handling
//!
//! A single error type covers the whole crate. There are no nested cause
//! chains: failures from the underlying cryptographic primitives collapse
//! into [`Error::Primitive`], and every other variant names one specific
//! protocol-level failure.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Error                                                          │
//! │  │                                                              │
//! │  ├── Crypto                                                     │
//! │  │   ├── Primitive            - key conversion / kx / KDF       │
//! │  │   ├── AuthFailure          - AEAD tag or signature mismatch  │
//! │  │   ├── BadSignature         - frame-level ephemeral-pk check  │
//! │  │   └── PassphraseOutOfRange - empty or oversized passphrase   │
//! │  │                                                              │
//! │  ├── Merkle                                                     │
//! │  │   ├── EmptyTree            - zero leaves                     │
//! │  │   ├── NotInTree            - element not a leaf              │
//! │  │   ├── BadProofLength       - not a multiple of 65 / too big  │
//! │  │   ├── BadProofEncoding     - position byte not 0 or 1        │
//! │  │   └── ProofMismatch        - inclusion check failed          │
//! │  │                                                              │
//! │  └── Wire                                                       │
//! │      └── UnsupportedSchemaVersion                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations are transactional: on any error, outputs are not produced and
//! secret intermediates have already been wiped (see [`crate::crypto`]).

use thiserror::Error;

/// Result type alias for Parcel Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Parcel Core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Crypto Errors
    // ========================================================================
    /// An underlying cryptographic primitive reported failure
    ///
    /// The inner description exists for logs; callers must not interpret it.
    #[error("cryptographic primitive failure: {0}")]
    Primitive(&'static str),

    /// AEAD authentication tag mismatch
    #[error("authentication failure")]
    AuthFailure,

    /// The frame-level signature over the ephemeral public key is invalid
    #[error("invalid frame signature")]
    BadSignature,

    /// Passphrase is empty or exceeds the KDF maximum
    #[error("passphrase length out of range")]
    PassphraseOutOfRange,

    // ========================================================================
    // Merkle Errors
    // ========================================================================
    /// A Merkle tree needs at least one leaf
    #[error("empty Merkle tree")]
    EmptyTree,

    /// The element hash is not among the tree leaves
    #[error("element not in Merkle tree")]
    NotInTree,

    /// Proof byte length is not a multiple of the artifact size, or exceeds
    /// the wire envelope
    #[error("invalid Merkle proof length: {0} bytes")]
    BadProofLength(usize),

    /// A proof artifact carries a position byte other than 0 or 1
    #[error("invalid Merkle proof encoding")]
    BadProofEncoding,

    /// The chunk hash is not included in the expected root under the
    /// embedded proof
    #[error("Merkle proof does not match expected root")]
    ProofMismatch,

    // ========================================================================
    // Wire Errors
    // ========================================================================
    /// Metadata carries a schema version this reader does not understand
    #[error("unsupported schema version: {0}")]
    UnsupportedSchemaVersion(u64),

    /// A logical chunk longer than the frame's chunk region was supplied
    #[error("chunk exceeds frame capacity: {0} bytes")]
    ChunkTooLarge(usize),
}

// ============================================================================
// TESTS
// ============================================================================
