//! # Frame Metadata
//!
//! The fixed 369-byte header carried inside every frame's plaintext. It
//! describes where the chunk sits within the overall payload; the payload
//! hash and indices pass through this core untouched.
//!
//! The name field is a zero-padded 256-byte string on the wire. Names
//! longer than 256 bytes are truncated at serialization; trailing NUL
//! bytes are trimmed back off at deserialization.

use serde::{Deserialize, Serialize};

use crate::crypto::HASH_LEN;
use crate::error::{Error, Result};
use crate::wire::{METADATA_LEN, NAME_LEN};

/// The metadata schema version this build reads and writes
pub const SCHEMA_VERSION: u64 = 1;

/// Per-frame metadata header
///
/// All integer fields serialize big-endian. Serializes to app-level JSON
/// with the payload hash hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Wire schema version; readers reject values they do not know
    pub schema_version: u64,
    /// Application-defined message type tag
    pub message_type: u8,
    /// SHA-512 of the entire payload the Merkle tree commits to
    #[serde(with = "hex_hash")]
    pub payload_hash: [u8; HASH_LEN],
    /// Total payload size in bytes
    pub total_size: u64,
    /// Sender timestamp, Unix milliseconds
    pub date_ms: i64,
    /// Payload name; at most [`NAME_LEN`] bytes on the wire
    pub name: String,
    /// First chunk index of the transfer window
    pub chunk_start_index: u64,
    /// Last chunk index of the transfer window
    pub chunk_end_index: u64,
    /// Index of the chunk carried by this frame
    pub chunk_index: u64,
}

impl Metadata {
    /// Serialize to the fixed wire layout
    ///
    /// The name is truncated to [`NAME_LEN`] bytes and zero-padded.
    pub fn to_bytes(&self) -> [u8; METADATA_LEN] {
        let mut out = [0u8; METADATA_LEN];
        let mut off = 0;

        out[off..off + 8].copy_from_slice(&self.schema_version.to_be_bytes());
        off += 8;
        out[off] = self.message_type;
        off += 1;
        out[off..off + HASH_LEN].copy_from_slice(&self.payload_hash);
        off += HASH_LEN;
        out[off..off + 8].copy_from_slice(&self.total_size.to_be_bytes());
        off += 8;
        out[off..off + 8].copy_from_slice(&self.date_ms.to_be_bytes());
        off += 8;

        let name = self.name.as_bytes();
        let name_len = name.len().min(NAME_LEN);
        out[off..off + name_len].copy_from_slice(&name[..name_len]);
        off += NAME_LEN;

        out[off..off + 8].copy_from_slice(&self.chunk_start_index.to_be_bytes());
        off += 8;
        out[off..off + 8].copy_from_slice(&self.chunk_end_index.to_be_bytes());
        off += 8;
        out[off..off + 8].copy_from_slice(&self.chunk_index.to_be_bytes());
        off += 8;

        debug_assert_eq!(off, METADATA_LEN);
        out
    }

    /// Parse from the fixed wire layout
    ///
    /// Trailing NUL bytes are trimmed from the name; interior NULs are
    /// kept. Non-UTF-8 name bytes are replaced rather than rejected.
    ///
    /// ## Errors
    ///
    /// [`Error::UnsupportedSchemaVersion`] for any version other than
    /// [`SCHEMA_VERSION`].
    pub fn from_bytes(bytes: &[u8; METADATA_LEN]) -> Result<Self> {
        let mut off = 0;

        let schema_version = read_u64(bytes, &mut off);
        if schema_version != SCHEMA_VERSION {
            return Err(Error::UnsupportedSchemaVersion(schema_version));
        }

        let message_type = bytes[off];
        off += 1;

        let mut payload_hash = [0u8; HASH_LEN];
        payload_hash.copy_from_slice(&bytes[off..off + HASH_LEN]);
        off += HASH_LEN;

        let total_size = read_u64(bytes, &mut off);
        let date_ms = read_u64(bytes, &mut off) as i64;

        let raw_name = &bytes[off..off + NAME_LEN];
        off += NAME_LEN;
        let name_end = raw_name
            .iter()
            .rposition(|&byte| byte != 0)
            .map_or(0, |last| last + 1);
        let name = String::from_utf8_lossy(&raw_name[..name_end]).into_owned();

        let chunk_start_index = read_u64(bytes, &mut off);
        let chunk_end_index = read_u64(bytes, &mut off);
        let chunk_index = read_u64(bytes, &mut off);
        debug_assert_eq!(off, METADATA_LEN);

        Ok(Self {
            schema_version,
            message_type,
            payload_hash,
            total_size,
            date_ms,
            name,
            chunk_start_index,
            chunk_end_index,
            chunk_index,
        })
    }
}

fn read_u64(bytes: &[u8], off: &mut usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[*off..*off + 8]);
    *off += 8;
    u64::from_be_bytes(raw)
}

/// Serde helper for hex-encoding the 64-byte payload hash
mod hex_hash {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 64], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 64], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid hash length"))
    }
}

// ============================================================================
// TESTS
// ============================================================================
