//! # Parcel Core
//!
//! The cryptography core of Parcel, a peer-to-peer encrypted chunked
//! file/message transfer system. This crate owns the wire frame and the
//! crypto that fills it; transport, key storage, and chunk scheduling live
//! with the caller.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        PARCEL CORE MODULES                          │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────────┐     │
//! │  │   Crypto     │   │   Merkle     │   │        Wire          │     │
//! │  │              │   │              │   │                      │     │
//! │  │ - Identity   │   │ - Roots      │   │ - Metadata codec     │     │
//! │  │ - Argon2id   │   │ - Proofs     │   │ - Proof blob         │     │
//! │  │ - Signing    │   │ - Inclusion  │   │ - Frame assembly     │     │
//! │  │ - Envelope   │   │   checks     │   │ - Receive pipeline   │     │
//! │  └──────┬───────┘   └──────┬───────┘   └──────────┬───────────┘     │
//! │         │                  │                      │                 │
//! │         └──────────────────┴──────────────────────┘                 │
//! │                            │                                        │
//! │                     one 64 KiB frame:                               │
//! │      ephemeral pk ‖ sig ‖ AEAD(metadata ‖ proof ‖ chunk)            │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Protocol Sketch
//!
//! A sender holds its identity and a Merkle tree over the payload's chunk
//! hashes. Each chunk ships in a self-contained frame: fixed metadata, an
//! inclusion proof against the pre-committed root, and the chunk bytes,
//! sealed with a hybrid ChaCha20-Poly1305 envelope between the two
//! long-term Ed25519 identities and fronted by a signed ephemeral-key
//! commitment. The receiver verifies the signature, decrypts with the
//! agreed root as associated data, and checks the chunk's inclusion proof
//! before accepting a single byte.
//!
//! Per-frame operations are pure, synchronous, and independent; callers
//! may parallelize freely. The only slow path is the deliberately
//! memory-hard passphrase KDF.
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`crypto`] - Identities, seed derivation, signatures, hybrid envelope
//! - [`merkle`] - Merkle roots, inclusion proofs, verification
//! - [`wire`] - Frame layout, metadata codec, receive pipeline

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod crypto;
pub mod error;
pub mod merkle;
pub mod wire;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use crypto::{Identity, PublicKey, Signature};
pub use error::{Error, Result};
pub use merkle::MerkleProof;
pub use wire::{build_frame, receive_message, Metadata};
