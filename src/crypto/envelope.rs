//! # Hybrid Envelope
//!
//! Authenticated encryption between two long-term Ed25519 identities.
//! The identities are converted to X25519, a one-way session key is derived
//! with the kx construction below, and the payload is sealed with
//! ChaCha20-Poly1305 (IETF).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  SENDER                                                         │
//! │  ──────                                                         │
//! │  1. sender sk  ──SHA-512+clamp──► sender X25519 sk              │
//! │     receiver pk ──Ed→Montgomery──► receiver X25519 pk           │
//! │  2. q = X25519(sender_x_sk, receiver_x_pk)                      │
//! │  3. keys = BLAKE2b-512(q ‖ receiver_x_pk ‖ sender_x_pk)         │
//! │     session = keys[32..]   (the server tx half)                 │
//! │  4. output = nonce ‖ ChaCha20-Poly1305(session, nonce, data, ad)│
//! │                                                                 │
//! │  RECEIVER mirrors with its own secret key and keeps the client  │
//! │  rx half — the same 32 bytes.                                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Role asymmetry
//!
//! The kx construction hashes `q ‖ client_pk ‖ server_pk` and splits the
//! digest into an `(rx, tx)` pair, assigned to opposite halves depending
//! on role: the server's `tx` and the client's `rx` are both the trailing
//! 32 bytes. The sender is always the *server* (keeping `tx`) and the
//! receiver always the *client* (keeping `rx`). Both the hash-input
//! ordering and the role assignment are part of the wire protocol;
//! swapping roles breaks interoperability.
//!
//! ## Nonce policy
//!
//! Nonces are supplied by the caller; this module neither generates (apart
//! from the [`generate_nonce`] convenience) nor remembers them. Each
//! `(session key, nonce)` pair must be unique. Reuse breaks confidentiality.

use blake2::{Blake2b512, Digest};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Nonce as AeadNonce};
use rand::RngCore;
use x25519_dalek::{PublicKey as ExchangePublicKey, StaticSecret};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::{Identity, PublicKey, NONCE_LEN, SESSION_KEY_LEN, TAG_LEN};
use crate::error::{Error, Result};

/// Generate a random 12-byte nonce from the OS CSPRNG
///
/// Random nonces are safe for up to 2^32 messages per session key
/// (birthday bound for 96-bit nonces).
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Derive the 32-byte session key shared by one sender/receiver direction
///
/// `keys = BLAKE2b-512(q ‖ client_pk ‖ server_pk)`; the server's `tx` and
/// the client's `rx` are both `keys[32..]`, which is the half kept here.
/// The leading half (the reverse-direction key) is unused in this protocol
/// and never leaves this function.
fn session_key(
    own_secret: &StaticSecret,
    peer_public: &ExchangePublicKey,
    client_public: &ExchangePublicKey,
    server_public: &ExchangePublicKey,
) -> Result<Zeroizing<[u8; SESSION_KEY_LEN]>> {
    let shared = own_secret.diffie_hellman(peer_public);
    if !shared.was_contributory() {
        return Err(Error::Primitive("degenerate key exchange point"));
    }

    let mut hasher = Blake2b512::new();
    hasher.update(shared.as_bytes());
    hasher.update(client_public.as_bytes());
    hasher.update(server_public.as_bytes());
    let mut digest: [u8; 64] = hasher.finalize().into();

    let mut session = Zeroizing::new([0u8; SESSION_KEY_LEN]);
    session.copy_from_slice(&digest[SESSION_KEY_LEN..]);
    digest.zeroize();
    Ok(session)
}

/// Encrypt a block from `sender` to the holder of `receiver_public_key`
///
/// Returns `nonce ‖ ciphertext ‖ tag`, exactly `data.len() + 28` bytes.
/// The associated data is authenticated but not encrypted; decryption with
/// different associated data fails.
pub fn encrypt(
    data: &[u8],
    receiver_public_key: &PublicKey,
    sender: &Identity,
    nonce: &[u8; NONCE_LEN],
    associated_data: &[u8],
) -> Result<Vec<u8>> {
    // Sender side is the kx server.
    let sender_x_secret = sender.exchange_secret();
    let sender_x_public = ExchangePublicKey::from(&sender_x_secret);
    let receiver_x_public = receiver_public_key.exchange_key()?;

    let session = session_key(
        &sender_x_secret,
        &receiver_x_public,
        &receiver_x_public,
        &sender_x_public,
    )?;

    let cipher = ChaCha20Poly1305::new_from_slice(session.as_slice())
        .map_err(|_| Error::Primitive("aead key setup"))?;
    let ciphertext = cipher
        .encrypt(
            AeadNonce::from_slice(nonce),
            Payload {
                msg: data,
                aad: associated_data,
            },
        )
        .map_err(|_| Error::Primitive("aead encryption"))?;

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt a block produced by [`encrypt`]
///
/// `encrypted` is `nonce ‖ ciphertext ‖ tag` as emitted by the sender.
///
/// ## Errors
///
/// [`Error::AuthFailure`] if the input is too short to carry a nonce and
/// tag, if any byte of the ciphertext, nonce, or tag was altered, or if the
/// associated data differs from encryption.
pub fn decrypt(
    encrypted: &[u8],
    sender_public_key: &PublicKey,
    receiver: &Identity,
    associated_data: &[u8],
) -> Result<Vec<u8>> {
    if encrypted.len() < NONCE_LEN + TAG_LEN {
        return Err(Error::AuthFailure);
    }

    // Receiver side is the kx client; same hash inputs as the sender.
    let receiver_x_secret = receiver.exchange_secret();
    let receiver_x_public = ExchangePublicKey::from(&receiver_x_secret);
    let sender_x_public = sender_public_key.exchange_key()?;

    let session = session_key(
        &receiver_x_secret,
        &sender_x_public,
        &receiver_x_public,
        &sender_x_public,
    )?;

    let (nonce, ciphertext) = encrypted.split_at(NONCE_LEN);

    let cipher = ChaCha20Poly1305::new_from_slice(session.as_slice())
        .map_err(|_| Error::Primitive("aead key setup"))?;
    cipher
        .decrypt(
            AeadNonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: associated_data,
            },
        )
        .map_err(|_| Error::AuthFailure)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn peers() -> (Identity, Identity) {
        (Identity::generate(), Identity::generate())
    }

    #[test]
    fn test_round_trip() {
        let (sender, receiver) = peers();
        let nonce = generate_nonce();
        let data = b"chunk payload bytes";
        let ad = b"payload root";

        let encrypted =
            encrypt(data, &receiver.public_key(), &sender, &nonce, ad).unwrap();
        assert_eq!(encrypted.len(), data.len() + NONCE_LEN + TAG_LEN);

        let decrypted = decrypt(&encrypted, &sender.public_key(), &receiver, ad).unwrap();
        assert_eq!(decrypted, data);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let (sender, receiver) = peers();
        let nonce = generate_nonce();
        let mut encrypted =
            encrypt(b"data", &receiver.public_key(), &sender, &nonce, b"ad").unwrap();

        encrypted[NONCE_LEN] ^= 0xFF;
        let err = decrypt(&encrypted, &sender.public_key(), &receiver, b"ad").unwrap_err();
        assert_eq!(err, Error::AuthFailure);
    }

    #[test]
    fn test_tampered_nonce_fails() {
        let (sender, receiver) = peers();
        let nonce = generate_nonce();
        let mut encrypted =
            encrypt(b"data", &receiver.public_key(), &sender, &nonce, b"ad").unwrap();

        encrypted[0] ^= 0x01;
        assert!(decrypt(&encrypted, &sender.public_key(), &receiver, b"ad").is_err());
    }

    #[test]
    fn test_tampered_tag_fails() {
        let (sender, receiver) = peers();
        let nonce = generate_nonce();
        let mut encrypted =
            encrypt(b"data", &receiver.public_key(), &sender, &nonce, b"ad").unwrap();

        let last = encrypted.len() - 1;
        encrypted[last] ^= 0x01;
        assert!(decrypt(&encrypted, &sender.public_key(), &receiver, b"ad").is_err());
    }

    #[test]
    fn test_wrong_associated_data_fails() {
        let (sender, receiver) = peers();
        let nonce = generate_nonce();
        let encrypted =
            encrypt(b"data", &receiver.public_key(), &sender, &nonce, b"ad one").unwrap();

        let err =
            decrypt(&encrypted, &sender.public_key(), &receiver, b"ad two").unwrap_err();
        assert_eq!(err, Error::AuthFailure);
    }

    #[test]
    fn test_wrong_receiver_fails() {
        let (sender, receiver) = peers();
        let eavesdropper = Identity::generate();
        let nonce = generate_nonce();
        let encrypted =
            encrypt(b"data", &receiver.public_key(), &sender, &nonce, b"ad").unwrap();

        assert!(decrypt(&encrypted, &sender.public_key(), &eavesdropper, b"ad").is_err());
    }

    #[test]
    fn test_truncated_input_fails() {
        let (sender, receiver) = peers();
        let err = decrypt(&[0u8; NONCE_LEN], &sender.public_key(), &receiver, b"").unwrap_err();
        assert_eq!(err, Error::AuthFailure);
    }

    #[test]
    fn test_direction_is_one_way() {
        // A frame encrypted A→B must not decrypt as if B had sent it to A.
        let (alice, bob) = peers();
        let nonce = generate_nonce();
        let encrypted = encrypt(b"data", &bob.public_key(), &alice, &nonce, b"ad").unwrap();

        assert!(decrypt(&encrypted, &bob.public_key(), &alice, b"ad").is_err());
    }
}
