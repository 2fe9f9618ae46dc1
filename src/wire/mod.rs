//! # Wire Format
//!
//! Fixed-size frame layout shared by both peers. Every frame is exactly
//! [`MESSAGE_LEN`] bytes; all multi-byte integers are big-endian.
//!
//! ```text
//! ┌──────────────┬──────────────┬───────┬──────────────────────┬──────┐
//! │ ephemeral pk │ sig over pk  │ nonce │  AEAD ciphertext     │ tag  │
//! │   32 bytes   │   64 bytes   │  12   │  DECRYPTED_LEN bytes │  16  │
//! └──────────────┴──────────────┴───────┴──────────────────────┴──────┘
//!                                        │
//!                                        ▼ (decrypts to)
//!                ┌──────────────┬────────────────┬─────────────────────┐
//!                │   metadata   │   proof blob   │       chunk         │
//!                │  369 bytes   │   3124 bytes   │  CHUNK_LEN bytes    │
//!                └──────────────┴────────────────┴─────────────────────┘
//! ```
//!
//! The chunk region is whatever is left of the 64 KiB frame once every
//! fixed-size field is accounted for; the layout is only valid if that
//! remainder is positive, which is asserted at compile time below.

pub mod frame;
pub mod metadata;

use crate::crypto::{HASH_LEN, NONCE_LEN, PUBLIC_KEY_LEN, SIGNATURE_LEN, TAG_LEN};
use crate::merkle::ARTIFACT_LEN;

pub use frame::{build_frame, decode_proof_blob, encode_proof_blob, receive_message};
pub use metadata::{Metadata, SCHEMA_VERSION};

/// Hard framing ceiling: every frame is exactly this many bytes
pub const MESSAGE_LEN: usize = 64 * 1024;

/// Wire width of the metadata name field
pub const NAME_LEN: usize = 256;

/// Serialized metadata size:
/// `schema_version(8) ‖ message_type(1) ‖ hash(64) ‖ total_size(8) ‖
/// date_ms(8) ‖ name(256) ‖ chunk_start(8) ‖ chunk_end(8) ‖ chunk_index(8)`
pub const METADATA_LEN: usize = 8 + 1 + HASH_LEN + 8 + 8 + NAME_LEN + 8 + 8 + 8;

/// Deepest proof the wire slot can carry (trees up to 2^48 leaves)
pub const PROOF_ARTIFACTS_MAX: usize = 48;

/// Fixed width of the proof blob: 4-byte length prefix plus artifact slots
pub const PROOF_LEN: usize = 4 + PROOF_ARTIFACTS_MAX * ARTIFACT_LEN;

/// Bytes of every frame that are not chunk payload
pub const IMPORTANT_DATA_LEN: usize =
    PUBLIC_KEY_LEN + SIGNATURE_LEN + METADATA_LEN + PROOF_LEN + NONCE_LEN + TAG_LEN;

/// Chunk region size: what remains of the frame after the fixed fields
pub const CHUNK_LEN: usize = MESSAGE_LEN - IMPORTANT_DATA_LEN;

/// AEAD plaintext size: metadata ‖ proof blob ‖ chunk
pub const DECRYPTED_LEN: usize = METADATA_LEN + PROOF_LEN + CHUNK_LEN;

/// AEAD envelope size: nonce ‖ ciphertext ‖ tag
pub const ENCRYPTED_LEN: usize = DECRYPTED_LEN + NONCE_LEN + TAG_LEN;

// The frame layout is invalid unless a chunk region remains, and the fields
// must tile MESSAGE_LEN exactly.
const _: () = assert!(MESSAGE_LEN > IMPORTANT_DATA_LEN);
const _: () = assert!(PUBLIC_KEY_LEN + SIGNATURE_LEN + ENCRYPTED_LEN == MESSAGE_LEN);
const _: () = assert!(METADATA_LEN == 369);
const _: () = assert!(PROOF_LEN == 3124);

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_arithmetic() {
        assert_eq!(IMPORTANT_DATA_LEN, 3617);
        assert_eq!(CHUNK_LEN, 61919);
        assert_eq!(DECRYPTED_LEN, 65412);
        assert_eq!(ENCRYPTED_LEN, 65440);
    }
}
