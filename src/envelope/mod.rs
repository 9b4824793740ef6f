// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Encryption envelope codec.
//!
//! Records are sealed with AES-256-GCM under a per-upload key and framed
//! into a self-describing blob, so the content store only ever sees
//! ciphertext plus the parameters needed to open it with the right key.

pub mod cipher;
pub mod frame;

pub use cipher::{open, seal, EncryptionKey, ALGORITHM_ID, IV_SIZE, KEY_SIZE, TAG_SIZE};
pub use frame::{frame, unframe};

/// A sealed record: cipher parameters plus ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionEnvelope {
    pub algorithm_id: String,
    pub iv: [u8; IV_SIZE],
    pub auth_tag: [u8; TAG_SIZE],
    pub ciphertext: Vec<u8>,
}

/// Errors raised while sealing, opening or (un)framing envelopes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("system randomness unavailable")]
    Randomness,

    #[error("encryption failed")]
    Encryption,

    #[error("decryption key must be {} hex-encoded bytes", KEY_SIZE)]
    InvalidKey,

    #[error("storage object is truncated")]
    Truncated,

    #[error("invalid envelope header: {0}")]
    InvalidHeader(String),

    /// Uniform for wrong key, wrong IV, tampered data or tag.
    #[error("decryption failed")]
    DecryptionFailed,
}
