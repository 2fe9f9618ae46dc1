//! # Digital Signatures
//!
//! Detached Ed25519 signatures. Each frame carries a signature by the
//! sender's long-term identity over the frame's ephemeral public key; the
//! receiver checks it before spending any work on decryption.
//!
//! Ed25519 signatures are deterministic: signing the same message with the
//! same key always produces the same 64-byte signature.

use ed25519_dalek::{Signature as Ed25519Signature, Signer, Verifier};
use serde::{Deserialize, Serialize};

use crate::crypto::{Identity, PublicKey, SIGNATURE_LEN};

/// A detached Ed25519 signature
///
/// Serializes as a hex string for app-level JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "signature_bytes")] pub [u8; SIGNATURE_LEN]);

impl Signature {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Encode as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Sign a message with an identity's secret key
pub fn sign(identity: &Identity, message: &[u8]) -> Signature {
    let sig = identity.signing_key().sign(message);
    Signature(sig.to_bytes())
}

/// Verify a detached signature
///
/// Returns `false` for a bad signature and for public-key bytes that do not
/// decode to a valid Ed25519 point; verification never errors.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    let Ok(verifying_key) = public_key.verifying_key() else {
        return false;
    };
    let sig = Ed25519Signature::from_bytes(&signature.0);
    verifying_key.verify(message, &sig).is_ok()
}

/// Serde helper for signature bytes
mod signature_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 64], serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<[u8; 64], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid signature length"))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let identity = Identity::generate();
        let message = b"Hello, World!";

        let signature = sign(&identity, message);
        assert!(verify(&identity.public_key(), message, &signature));
    }

    #[test]
    fn test_verify_wrong_message_fails() {
        let identity = Identity::generate();
        let signature = sign(&identity, b"Hello, World!");
        assert!(!verify(&identity.public_key(), b"Wrong message!", &signature));
    }

    #[test]
    fn test_verify_wrong_key_fails() {
        let identity1 = Identity::generate();
        let identity2 = Identity::generate();
        let signature = sign(&identity1, b"Hello, World!");
        assert!(!verify(&identity2.public_key(), b"Hello, World!", &signature));
    }

    #[test]
    fn test_deterministic_signatures() {
        let identity = Identity::generate();
        let sig1 = sign(&identity, b"Hello, World!");
        let sig2 = sign(&identity, b"Hello, World!");
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_invalid_public_key_fails_closed() {
        let identity = Identity::generate();
        let signature = sign(&identity, b"msg");
        // Not a valid curve point.
        let bogus = PublicKey::from_bytes([0xFF; 32]);
        assert!(!verify(&bogus, b"msg", &signature));
    }

    #[test]
    fn test_signature_serde_round_trip() {
        let identity = Identity::generate();
        let signature = sign(&identity, b"test");

        let json = serde_json::to_string(&signature).unwrap();
        assert!(json.contains(&signature.to_hex()));
        let restored: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(signature, restored);
    }
}
