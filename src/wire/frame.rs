//! # Frame Assembly & Receive Pipeline
//!
//! A frame binds one chunk to the payload it belongs to:
//!
//! ```text
//! SENDER                                      RECEIVER
//! ──────                                      ────────
//! metadata ‖ proof blob ‖ chunk               1. verify sig(ephemeral pk)
//!        │ encrypt (ad = Merkle root)         2. decrypt (ad = Merkle root)
//!        ▼                                    3. decode proof blob
//! ephemeral pk ‖ sig ‖ nonce ‖ ct ‖ tag       4. hash chunk region
//!        │                                    5. verify Merkle inclusion
//!        └────────── 65536 bytes ────────────►
//! ```
//!
//! The ephemeral Ed25519 public key is a per-frame identity commitment:
//! signed by the sender's long-term key and verified by the receiver, but
//! not mixed into the AEAD session, which is derived from the long-term
//! identities alone. Binding the AEAD to the agreed Merkle root means a
//! frame cannot be replayed into a session expecting a different payload.

use crate::crypto::{
    envelope, sha512, sign, verify, Identity, PublicKey, Signature, HASH_LEN, NONCE_LEN,
    PUBLIC_KEY_LEN, SIGNATURE_LEN,
};
use crate::error::{Error, Result};
use crate::merkle::{self, MerkleProof, ARTIFACT_LEN};
use crate::wire::{Metadata, CHUNK_LEN, DECRYPTED_LEN, MESSAGE_LEN, METADATA_LEN, PROOF_LEN};

/// Encode a proof into the fixed-width wire blob
///
/// Layout: big-endian `u32` byte length, the artifacts, zero padding out
/// to [`PROOF_LEN`].
///
/// ## Errors
///
/// [`Error::BadProofLength`] when the proof is deeper than the blob can
/// carry (more than 48 artifacts).
pub fn encode_proof_blob(proof: &MerkleProof) -> Result<[u8; PROOF_LEN]> {
    let artifacts = proof.to_bytes();
    if artifacts.len() > PROOF_LEN - 4 {
        return Err(Error::BadProofLength(artifacts.len()));
    }

    let mut blob = [0u8; PROOF_LEN];
    blob[..4].copy_from_slice(&(artifacts.len() as u32).to_be_bytes());
    blob[4..4 + artifacts.len()].copy_from_slice(&artifacts);
    Ok(blob)
}

/// Decode a proof from the fixed-width wire blob
///
/// `blob` is the [`PROOF_LEN`]-byte region of a decrypted frame. The
/// inline length must be a multiple of the artifact size and fit the blob.
pub fn decode_proof_blob(blob: &[u8]) -> Result<MerkleProof> {
    if blob.len() < 4 {
        return Err(Error::BadProofLength(blob.len()));
    }
    let declared = u32::from_be_bytes([blob[0], blob[1], blob[2], blob[3]]) as usize;
    if declared % ARTIFACT_LEN != 0 || declared > blob.len() - 4 {
        return Err(Error::BadProofLength(declared));
    }
    MerkleProof::from_bytes(&blob[4..4 + declared])
}

/// Assemble one wire frame for a chunk
///
/// `chunk` is the logical chunk, at most [`CHUNK_LEN`] bytes; shorter
/// chunks are zero-padded and the metadata fields carry the logical
/// extents. `merkle_root` doubles as the AEAD associated data. A fresh
/// ephemeral Ed25519 key is generated per frame; only its public half is
/// used, signed by the sender's long-term identity.
///
/// The returned frame is exactly [`MESSAGE_LEN`] bytes.
pub fn build_frame(
    metadata: &Metadata,
    proof: &MerkleProof,
    chunk: &[u8],
    receiver_public_key: &PublicKey,
    sender: &Identity,
    nonce: &[u8; NONCE_LEN],
    merkle_root: &[u8; HASH_LEN],
) -> Result<Vec<u8>> {
    if chunk.len() > CHUNK_LEN {
        return Err(Error::ChunkTooLarge(chunk.len()));
    }

    let mut plaintext = vec![0u8; DECRYPTED_LEN];
    plaintext[..METADATA_LEN].copy_from_slice(&metadata.to_bytes());
    let blob = encode_proof_blob(proof)?;
    plaintext[METADATA_LEN..METADATA_LEN + PROOF_LEN].copy_from_slice(&blob);
    let chunk_start = METADATA_LEN + PROOF_LEN;
    plaintext[chunk_start..chunk_start + chunk.len()].copy_from_slice(chunk);

    let ephemeral_public_key = Identity::generate().public_key();
    let signature = sign(sender, ephemeral_public_key.as_bytes());

    let envelope = envelope::encrypt(&plaintext, receiver_public_key, sender, nonce, merkle_root)?;

    let mut frame = Vec::with_capacity(MESSAGE_LEN);
    frame.extend_from_slice(ephemeral_public_key.as_bytes());
    frame.extend_from_slice(signature.as_bytes());
    frame.extend_from_slice(&envelope);
    debug_assert_eq!(frame.len(), MESSAGE_LEN);

    tracing::trace!(chunk_index = metadata.chunk_index, "frame assembled");
    Ok(frame)
}

/// Verify and open one received frame
///
/// Runs the full pipeline: frame signature, decryption bound to the agreed
/// root, proof-blob decoding, chunk hashing, Merkle inclusion. Returns the
/// decrypted `metadata ‖ proof blob ‖ chunk` plaintext; callers parse the
/// metadata with [`Metadata::from_bytes`] to locate the logical chunk
/// bytes within the padded region.
///
/// ## Errors
///
/// - [`Error::BadSignature`] — ephemeral-pk signature check failed
/// - [`Error::AuthFailure`] — decryption failed (tampering, wrong keys, or
///   a different Merkle root on either side)
/// - [`Error::BadProofLength`] / [`Error::BadProofEncoding`] — malformed
///   embedded proof
/// - [`Error::ProofMismatch`] — the chunk is not part of the agreed payload
pub fn receive_message(
    frame: &[u8; MESSAGE_LEN],
    merkle_root: &[u8; HASH_LEN],
    sender_public_key: &PublicKey,
    receiver: &Identity,
) -> Result<Vec<u8>> {
    let ephemeral_public_key = &frame[..PUBLIC_KEY_LEN];
    let mut signature_bytes = [0u8; SIGNATURE_LEN];
    signature_bytes.copy_from_slice(&frame[PUBLIC_KEY_LEN..PUBLIC_KEY_LEN + SIGNATURE_LEN]);
    let signature = Signature::from_bytes(signature_bytes);

    if !verify(sender_public_key, ephemeral_public_key, &signature) {
        return Err(Error::BadSignature);
    }

    let plaintext = envelope::decrypt(
        &frame[PUBLIC_KEY_LEN + SIGNATURE_LEN..],
        sender_public_key,
        receiver,
        merkle_root,
    )?;
    debug_assert_eq!(plaintext.len(), DECRYPTED_LEN);

    let proof = decode_proof_blob(&plaintext[METADATA_LEN..METADATA_LEN + PROOF_LEN])?;

    let chunk_hash = sha512(&plaintext[METADATA_LEN + PROOF_LEN..]);
    if !merkle::verify_proof(&chunk_hash, merkle_root, &proof)? {
        return Err(Error::ProofMismatch);
    }

    tracing::debug!(proof_artifacts = proof.len(), "frame verified against payload root");
    Ok(plaintext)
}

// ============================================================================
// TESTS
// ============================================================================
