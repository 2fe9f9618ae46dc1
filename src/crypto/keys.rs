//! # Identity Keys
//!
//! A Parcel identity is a single long-lived Ed25519 keypair. The same
//! keypair serves two purposes:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Identity (Ed25519)                                             │
//! │  ──────────────────                                             │
//! │                                                                 │
//! │  • Signing: per-frame ephemeral-key commitments                 │
//! │  • Key exchange: converted to X25519 for the hybrid envelope    │
//! │                                                                 │
//! │  Secret key: 64 bytes on the wire (seed ‖ public key)           │
//! │  Public key: 32 bytes (shared freely)                           │
//! │                                                                 │
//! │  Sources:                                                       │
//! │  • OS CSPRNG                    → Identity::generate()          │
//! │  • 32-byte seed                 → Identity::from_seed()         │
//! │  • passphrase + salt (Argon2id) → Identity::from_passphrase()   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ed25519 → X25519 conversion
//!
//! The envelope never uses Ed25519 keys directly. Secret keys convert by
//! hashing the seed with SHA-512 and clamping the first 32 bytes; public
//! keys convert through the Edwards→Montgomery birational map. The two
//! conversions are consistent: the converted public key equals the X25519
//! base-point multiple of the converted secret key.

use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use x25519_dalek::{PublicKey as ExchangePublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::{EXCHANGE_KEY_LEN, PUBLIC_KEY_LEN, SALT_LEN, SECRET_KEY_LEN, SEED_LEN};
use crate::error::{Error, Result};

/// A long-lived signing identity
///
/// ## Security
///
/// - The inner secret key is zeroized when this struct is dropped
/// - Derivation from `(passphrase, salt)` or a seed is deterministic
/// - Export only through [`Identity::secret_key_bytes`], which hands back
///   a self-wiping buffer
#[derive(ZeroizeOnDrop)]
pub struct Identity {
    /// Private signing key (secret)
    #[zeroize(skip)] // ed25519_dalek::SigningKey handles its own zeroization
    secret: SigningKey,
}

impl Identity {
    /// Generate a new random identity from the OS CSPRNG
    ///
    /// Keys created this way cannot be recovered without a backup of the
    /// secret-key bytes; for passphrase-recoverable identities use
    /// [`Identity::from_passphrase`].
    pub fn generate() -> Self {
        let secret = SigningKey::generate(&mut rand::rngs::OsRng);
        Self { secret }
    }

    /// Derive an identity from a 32-byte seed
    ///
    /// Deterministic: the same seed always produces the same keypair.
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        Self {
            secret: SigningKey::from_bytes(seed),
        }
    }

    /// Derive an identity from a passphrase and salt
    ///
    /// Runs the memory-hard KDF (see [`crate::crypto::kdf`]) and feeds the
    /// resulting seed into [`Identity::from_seed`]. Intentionally slow.
    pub fn from_passphrase(passphrase: &[u8], salt: &[u8; SALT_LEN]) -> Result<Self> {
        let seed = super::kdf::derive_seed(passphrase, salt)?;
        Ok(Self::from_seed(&seed))
    }

    /// Import an identity from its 64-byte secret-key encoding
    ///
    /// The encoding is `seed ‖ public_key`; the public half is recomputed
    /// and must match the trailing 32 bytes.
    pub fn from_secret_key_bytes(bytes: &[u8; SECRET_KEY_LEN]) -> Result<Self> {
        let secret = SigningKey::from_keypair_bytes(bytes)
            .map_err(|_| Error::Primitive("secret key encoding mismatch"))?;
        Ok(Self { secret })
    }

    /// Public identity key for sharing with peers
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.secret.verifying_key().to_bytes())
    }

    /// Export the 64-byte secret-key encoding (`seed ‖ public_key`)
    ///
    /// ## Security Warning
    ///
    /// Only use this for secure storage. Never log or transmit these bytes.
    pub fn secret_key_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LEN]> {
        Zeroizing::new(self.secret.to_keypair_bytes())
    }

    /// Get reference to the signing key
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.secret
    }

    /// Convert the secret key to its X25519 form
    ///
    /// SHA-512 of the seed, first 32 bytes clamped. The returned secret
    /// zeroizes on drop.
    pub(crate) fn exchange_secret(&self) -> StaticSecret {
        let seed = Zeroizing::new(self.secret.to_bytes());
        let mut digest: [u8; 64] = Sha512::digest(seed.as_slice()).into();
        let mut scalar = [0u8; EXCHANGE_KEY_LEN];
        scalar.copy_from_slice(&digest[..EXCHANGE_KEY_LEN]);
        digest.zeroize();
        scalar[0] &= 248;
        scalar[31] &= 127;
        scalar[31] |= 64;
        StaticSecret::from(scalar)
    }

    /// X25519 public key matching [`Identity::exchange_secret`]
    pub fn exchange_public_bytes(&self) -> [u8; EXCHANGE_KEY_LEN] {
        *ExchangePublicKey::from(&self.exchange_secret()).as_bytes()
    }
}

/// A peer's public identity key
///
/// Contains only public information; safe to serialize, transmit, and
/// store. Serializes as a hex string for app-level JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "hex_bytes")] pub [u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Create a PublicKey from raw bytes
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Encode as hex string (for display/QR codes)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the verifying key for signature verification
    pub(crate) fn verifying_key(&self) -> Result<VerifyingKey> {
        VerifyingKey::from_bytes(&self.0).map_err(|_| Error::Primitive("invalid ed25519 public key"))
    }

    /// Convert to the X25519 form used by the envelope
    ///
    /// Edwards→Montgomery map; fails on bytes that are not a valid curve
    /// point.
    pub(crate) fn exchange_key(&self) -> Result<ExchangePublicKey> {
        let montgomery = self.verifying_key()?.to_montgomery();
        Ok(ExchangePublicKey::from(montgomery.to_bytes()))
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Serde helper for serializing byte arrays as hex
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid length"))
    }
}

// ============================================================================
// TESTS
// ============================================================================
