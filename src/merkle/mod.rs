//! # Merkle Engine
//!
//! Binary SHA-512 Merkle trees over ordered leaf hashes, balanced by
//! duplication: at every level with an odd node count, the last node is
//! paired with itself. Internal nodes hash `left ‖ right`.
//!
//! ```text
//!                root = H(H(L0‖L1) ‖ H(L2‖L2))
//!               ┌───────────┴───────────┐
//!           H(L0‖L1)                H(L2‖L2)   ← odd level: L2 duplicated
//!          ┌────┴────┐             ┌────┴────┐
//!          L0        L1            L2      (L2)
//! ```
//!
//! A proof for one leaf is an ordered list of *artifacts*, one per level:
//! the sibling hash plus a position byte telling the verifier which side
//! the sibling concatenates on (`0` = left, `1` = right). Walking the
//! artifacts from the leaf upward reproduces the root.
//!
//! Root computation and proof generation are `O(n)`; verification is
//! `O(log n)`. Everything here is a pure function of its inputs.

use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use crate::crypto::HASH_LEN;
use crate::error::{Error, Result};

/// Wire size of one proof artifact: sibling hash plus position byte
pub const ARTIFACT_LEN: usize = HASH_LEN + 1;

/// Position byte: the sibling concatenates on the left of the running hash
pub const POSITION_LEFT: u8 = 0;

/// Position byte: the sibling concatenates on the right of the running hash
pub const POSITION_RIGHT: u8 = 1;

/// One step of a Merkle proof
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofArtifact {
    /// Hash of the sibling node at this level
    pub sibling: [u8; HASH_LEN],
    /// [`POSITION_LEFT`] or [`POSITION_RIGHT`]; other values are rejected
    /// when the proof is folded
    pub position: u8,
}

/// An inclusion proof: ordered artifacts from leaf level to the root
///
/// A single-leaf tree proves itself with zero artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MerkleProof {
    artifacts: Vec<ProofArtifact>,
}

impl MerkleProof {
    /// The proof's artifacts, leaf level first
    pub fn artifacts(&self) -> &[ProofArtifact] {
        &self.artifacts
    }

    /// Number of artifacts (tree depth covered by this proof)
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the proof has no artifacts (single-leaf tree)
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Serialize to the concatenated `sibling ‖ position` wire bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.artifacts.len() * ARTIFACT_LEN);
        for artifact in &self.artifacts {
            out.extend_from_slice(&artifact.sibling);
            out.push(artifact.position);
        }
        out
    }

    /// Parse from concatenated wire bytes
    ///
    /// The length must be a multiple of [`ARTIFACT_LEN`]. Position bytes
    /// are carried through verbatim; values other than 0/1 surface as
    /// [`Error::BadProofEncoding`] when the proof is folded.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % ARTIFACT_LEN != 0 {
            return Err(Error::BadProofLength(bytes.len()));
        }
        let artifacts = bytes
            .chunks_exact(ARTIFACT_LEN)
            .map(|chunk| {
                let mut sibling = [0u8; HASH_LEN];
                sibling.copy_from_slice(&chunk[..HASH_LEN]);
                ProofArtifact {
                    sibling,
                    position: chunk[HASH_LEN],
                }
            })
            .collect();
        Ok(Self { artifacts })
    }
}

/// Hash one internal node: SHA-512 of `left ‖ right`
fn hash_pair(left: &[u8; HASH_LEN], right: &[u8; HASH_LEN]) -> [u8; HASH_LEN] {
    let mut hasher = Sha512::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Constant-time hash equality
fn ct_hash_eq(a: &[u8; HASH_LEN], b: &[u8; HASH_LEN]) -> bool {
    a[..].ct_eq(&b[..]).into()
}

/// Compute the root of a tree over `leaves`
///
/// Deterministic; depends only on the leaf sequence. A single leaf is its
/// own root.
///
/// ## Errors
///
/// [`Error::EmptyTree`] for zero leaves.
pub fn merkle_root(leaves: &[[u8; HASH_LEN]]) -> Result<[u8; HASH_LEN]> {
    if leaves.is_empty() {
        return Err(Error::EmptyTree);
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => hash_pair(left, right),
                // Odd level: the trailing node pairs with itself.
                [last] => hash_pair(last, last),
                _ => unreachable!("chunks(2) yields one- or two-element slices"),
            })
            .collect();
    }
    Ok(level[0])
}

/// Produce an inclusion proof for `element_hash`
///
/// The element is located by the first matching leaf. At every level one
/// artifact records the sibling and its side; the duplicated-odd node
/// proves against itself with position fixed to [`POSITION_LEFT`].
///
/// ## Errors
///
/// [`Error::EmptyTree`] for zero leaves, [`Error::NotInTree`] when
/// `element_hash` is not a leaf.
pub fn merkle_proof(leaves: &[[u8; HASH_LEN]], element_hash: &[u8; HASH_LEN]) -> Result<MerkleProof> {
    if leaves.is_empty() {
        return Err(Error::EmptyTree);
    }
    let mut index = leaves
        .iter()
        .position(|leaf| leaf == element_hash)
        .ok_or(Error::NotInTree)?;

    let mut artifacts = Vec::new();
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for (parent_index, pair) in level.chunks(2).enumerate() {
            let first = 2 * parent_index;
            match pair {
                [left, right] => {
                    if first == index {
                        artifacts.push(ProofArtifact {
                            sibling: *right,
                            position: POSITION_RIGHT,
                        });
                        index = parent_index;
                    } else if first + 1 == index {
                        artifacts.push(ProofArtifact {
                            sibling: *left,
                            position: POSITION_LEFT,
                        });
                        index = parent_index;
                    }
                    next.push(hash_pair(left, right));
                }
                [last] => {
                    if first == index {
                        // Self-paired node: side is immaterial, fixed to
                        // left for determinism.
                        artifacts.push(ProofArtifact {
                            sibling: *last,
                            position: POSITION_LEFT,
                        });
                        index = parent_index;
                    }
                    next.push(hash_pair(last, last));
                }
                _ => unreachable!("chunks(2) yields one- or two-element slices"),
            }
        }
        level = next;
    }
    Ok(MerkleProof { artifacts })
}

/// Reconstruct the root implied by `element_hash` and a proof
///
/// Folds the artifacts from the leaf upward. Two single-leaf forms are
/// accepted: an empty proof, and one artifact equal to the element hash
/// itself (the self-paired encoding) — both resolve to the element.
///
/// ## Errors
///
/// [`Error::BadProofEncoding`] for a position byte other than 0 or 1.
pub fn root_from_proof(
    element_hash: &[u8; HASH_LEN],
    proof: &MerkleProof,
) -> Result<[u8; HASH_LEN]> {
    if let [only] = proof.artifacts() {
        if ct_hash_eq(&only.sibling, element_hash) {
            return Ok(*element_hash);
        }
    }

    let mut acc = *element_hash;
    for artifact in proof.artifacts() {
        acc = match artifact.position {
            POSITION_LEFT => hash_pair(&artifact.sibling, &acc),
            POSITION_RIGHT => hash_pair(&acc, &artifact.sibling),
            _ => return Err(Error::BadProofEncoding),
        };
    }
    Ok(acc)
}

/// Check that `element_hash` is included under `root` by `proof`
///
/// The root comparison is constant time.
///
/// ## Errors
///
/// [`Error::BadProofEncoding`] for a malformed position byte; a proof that
/// folds to the wrong root returns `Ok(false)`.
pub fn verify_proof(
    element_hash: &[u8; HASH_LEN],
    root: &[u8; HASH_LEN],
    proof: &MerkleProof,
) -> Result<bool> {
    let computed = root_from_proof(element_hash, proof)?;
    Ok(ct_hash_eq(&computed, root))
}

// ============================================================================
// TESTS
// ============================================================================
