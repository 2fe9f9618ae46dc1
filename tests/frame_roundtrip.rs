//! End-to-end scenarios: sender assembles frames, receiver verifies and
//! recovers chunks, and every protocol layer rejects what it must.

use parcel_core::crypto::{
    self, derive_seed, generate_nonce, sha512, Identity, HASH_LEN, NONCE_LEN, SALT_LEN,
};
use parcel_core::merkle::{merkle_proof, merkle_root, verify_proof, ARTIFACT_LEN};
use parcel_core::wire::{
    build_frame, receive_message, Metadata, CHUNK_LEN, DECRYPTED_LEN, MESSAGE_LEN, METADATA_LEN,
    PROOF_LEN, SCHEMA_VERSION,
};
use parcel_core::{Error, Signature};

fn chunk_of(data: &[u8]) -> Vec<u8> {
    let mut chunk = vec![0u8; CHUNK_LEN];
    chunk[..data.len()].copy_from_slice(data);
    chunk
}

fn metadata_for(chunk_index: u64, payload: &[u8], name: &str) -> Metadata {
    Metadata {
        schema_version: SCHEMA_VERSION,
        message_type: 1,
        payload_hash: sha512(payload),
        total_size: payload.len() as u64,
        date_ms: 1_722_470_400_000,
        name: name.to_string(),
        chunk_start_index: 0,
        chunk_end_index: 0,
        chunk_index,
    }
}

#[test]
fn deterministic_identity_from_passphrase() {
    let passphrase = b"correct horse battery staple";
    let salt = [0u8; SALT_LEN];

    let seed1 = derive_seed(passphrase, &salt).unwrap();
    let seed2 = derive_seed(passphrase, &salt).unwrap();
    assert_eq!(*seed1, *seed2);

    let id1 = Identity::from_seed(&seed1);
    let id2 = Identity::from_passphrase(passphrase, &salt).unwrap();
    assert_eq!(id1.public_key(), id2.public_key());
}

#[test]
fn empty_passphrase_rejected() {
    let salt = [0u8; SALT_LEN];
    assert_eq!(
        derive_seed(b"", &salt).unwrap_err(),
        Error::PassphraseOutOfRange
    );
}

#[test]
fn merkle_odd_level_fold_matches_expected_shape() {
    // Leaves are SHA-512 of "a", "b", "c"; expected root is
    // H( H(H(a)‖H(b)) ‖ H(H(c)‖H(c)) ).
    let leaves = [sha512(b"a"), sha512(b"b"), sha512(b"c")];

    let mut ab = Vec::with_capacity(2 * HASH_LEN);
    ab.extend_from_slice(&leaves[0]);
    ab.extend_from_slice(&leaves[1]);
    let ab = sha512(&ab);

    let mut cc = Vec::with_capacity(2 * HASH_LEN);
    cc.extend_from_slice(&leaves[2]);
    cc.extend_from_slice(&leaves[2]);
    let cc = sha512(&cc);

    let mut root_input = Vec::with_capacity(2 * HASH_LEN);
    root_input.extend_from_slice(&ab);
    root_input.extend_from_slice(&cc);
    let expected = sha512(&root_input);

    let root = merkle_root(&leaves).unwrap();
    assert_eq!(root, expected);

    // Proof for "b": H(a) on the left, then H(c‖c) on the right.
    let proof = merkle_proof(&leaves, &leaves[1]).unwrap();
    assert_eq!(proof.len(), 2);
    assert_eq!(proof.artifacts()[0].sibling, leaves[0]);
    assert_eq!(proof.artifacts()[0].position, 0);
    assert_eq!(proof.artifacts()[1].sibling, cc);
    assert_eq!(proof.artifacts()[1].position, 1);
    assert!(verify_proof(&leaves[1], &root, &proof).unwrap());
}

#[test]
fn envelope_round_trip_at_frame_size() {
    let sender = Identity::generate();
    let receiver = Identity::generate();
    let nonce = [9u8; NONCE_LEN];
    let data = vec![0u8; DECRYPTED_LEN];
    let root = merkle_root(&[sha512(b"a"), sha512(b"b"), sha512(b"c")]).unwrap();

    let encrypted =
        crypto::encrypt(&data, &receiver.public_key(), &sender, &nonce, &root).unwrap();
    assert_eq!(encrypted.len(), DECRYPTED_LEN + 28);

    let decrypted = crypto::decrypt(&encrypted, &sender.public_key(), &receiver, &root).unwrap();
    assert_eq!(decrypted, data);

    // One flipped ciphertext bit is fatal.
    let mut tampered = encrypted;
    tampered[NONCE_LEN + 100] ^= 0x01;
    assert_eq!(
        crypto::decrypt(&tampered, &sender.public_key(), &receiver, &root).unwrap_err(),
        Error::AuthFailure
    );
}

#[test]
fn full_frame_receive_single_leaf_payload() {
    let sender = Identity::generate();
    let receiver = Identity::generate();

    let chunk = chunk_of(b"hello");
    let leaf = sha512(&chunk);
    let root = merkle_root(&[leaf]).unwrap();
    let proof = merkle_proof(&[leaf], &leaf).unwrap();

    let frame = build_frame(
        &metadata_for(0, b"hello", "hello.txt"),
        &proof,
        &chunk,
        &receiver.public_key(),
        &sender,
        &generate_nonce(),
        &root,
    )
    .unwrap();
    assert_eq!(frame.len(), MESSAGE_LEN);

    let frame: &[u8; MESSAGE_LEN] = frame.as_slice().try_into().unwrap();
    let plaintext = receive_message(frame, &root, &sender.public_key(), &receiver).unwrap();
    assert_eq!(plaintext.len(), DECRYPTED_LEN);

    let metadata_bytes: &[u8; METADATA_LEN] = plaintext[..METADATA_LEN].try_into().unwrap();
    let metadata = Metadata::from_bytes(metadata_bytes).unwrap();
    assert_eq!(metadata.name, "hello.txt");
    assert_eq!(&plaintext[METADATA_LEN + PROOF_LEN..][..5], b"hello");

    // A receiver expecting a different payload root cannot even decrypt:
    // the root is the AEAD associated data.
    let other_root = merkle_root(&[sha512(b"other payload")]).unwrap();
    assert_eq!(
        receive_message(frame, &other_root, &sender.public_key(), &receiver).unwrap_err(),
        Error::AuthFailure
    );
}

#[test]
fn bad_proof_length_detected_after_decryption() {
    let sender = Identity::generate();
    let receiver = Identity::generate();

    let chunk = chunk_of(b"hello");
    let leaf = sha512(&chunk);
    let root = merkle_root(&[leaf]).unwrap();

    // Hand-assemble a frame whose proof blob declares a length that is not
    // a multiple of the artifact size.
    let bad_declared = (ARTIFACT_LEN + 3) as u32;
    let mut plaintext = vec![0u8; DECRYPTED_LEN];
    plaintext[..METADATA_LEN]
        .copy_from_slice(&metadata_for(0, b"hello", "hello.txt").to_bytes());
    plaintext[METADATA_LEN..METADATA_LEN + 4].copy_from_slice(&bad_declared.to_be_bytes());
    let chunk_start = METADATA_LEN + PROOF_LEN;
    plaintext[chunk_start..].copy_from_slice(&chunk);

    let ephemeral_public_key = Identity::generate().public_key();
    let signature = crypto::sign(&sender, ephemeral_public_key.as_bytes());
    let envelope = crypto::encrypt(
        &plaintext,
        &receiver.public_key(),
        &sender,
        &generate_nonce(),
        &root,
    )
    .unwrap();

    let mut frame = Vec::with_capacity(MESSAGE_LEN);
    frame.extend_from_slice(ephemeral_public_key.as_bytes());
    frame.extend_from_slice(signature.as_bytes());
    frame.extend_from_slice(&envelope);

    let frame: &[u8; MESSAGE_LEN] = frame.as_slice().try_into().unwrap();
    // Signature and decryption both succeed; the proof length check fires.
    assert_eq!(
        receive_message(frame, &root, &sender.public_key(), &receiver).unwrap_err(),
        Error::BadProofLength(ARTIFACT_LEN + 3)
    );
}

#[test]
fn metadata_survives_the_wire() {
    let metadata = Metadata {
        schema_version: SCHEMA_VERSION,
        message_type: 7,
        payload_hash: sha512(b"some payload"),
        total_size: 987_654_321,
        date_ms: 1_722_470_400_555,
        name: "réport.bin".to_string(),
        chunk_start_index: 11,
        chunk_end_index: 42,
        chunk_index: 23,
    };
    assert_eq!(metadata.name.len(), 11);

    let restored = Metadata::from_bytes(&metadata.to_bytes()).unwrap();
    assert_eq!(restored, metadata);
    assert_eq!(restored.name.len(), 11);
}

#[test]
fn frame_signature_field_is_a_valid_detached_signature() {
    let sender = Identity::generate();
    let receiver = Identity::generate();

    let chunk = chunk_of(b"hello");
    let leaf = sha512(&chunk);
    let root = merkle_root(&[leaf]).unwrap();
    let proof = merkle_proof(&[leaf], &leaf).unwrap();

    let frame = build_frame(
        &metadata_for(0, b"hello", "hello.txt"),
        &proof,
        &chunk,
        &receiver.public_key(),
        &sender,
        &generate_nonce(),
        &root,
    )
    .unwrap();

    // The leading 96 bytes are a self-describing commitment: ephemeral pk
    // plus the sender's signature over it.
    let signature = Signature::from_bytes(frame[32..96].try_into().unwrap());
    assert!(crypto::verify(&sender.public_key(), &frame[..32], &signature));
}
