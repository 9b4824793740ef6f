// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AES-256-GCM sealing with per-upload keys.
//!
//! Each upload gets a fresh 256-bit key and a fresh 128-bit IV. The tag is
//! kept detached so the envelope can carry it in its header. The key is
//! handed back to the caller exactly once; nothing in this crate stores it.

use std::fmt;

use aes_gcm::{
    aead::{consts::U16, AeadInPlace, KeyInit},
    aes::Aes256,
    AesGcm, Nonce, Tag,
};
use ring::rand::{SecureRandom, SystemRandom};

use super::{EncryptionEnvelope, EnvelopeError};

/// Identifier written into every envelope header.
pub const ALGORITHM_ID: &str = "aes-256-gcm";
/// Key length in bytes (256 bits).
pub const KEY_SIZE: usize = 32;
/// IV length in bytes (128 bits).
pub const IV_SIZE: usize = 16;
/// Authentication tag length in bytes (128 bits).
pub const TAG_SIZE: usize = 16;

/// AES-256-GCM with a 16-byte nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// A record encryption key.
///
/// `Debug` never prints key material.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; KEY_SIZE]);

impl EncryptionKey {
    /// Generate a key from the system CSPRNG.
    pub fn generate() -> Result<Self, EnvelopeError> {
        let mut bytes = [0u8; KEY_SIZE];
        fill_random(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Parse a hex key (optionally `0x`-prefixed). Must be exactly 32 bytes.
    pub fn from_hex(hex: &str) -> Result<Self, EnvelopeError> {
        let bytes = alloy::hex::decode(hex.trim()).map_err(|_| EnvelopeError::InvalidKey)?;
        let bytes: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| EnvelopeError::InvalidKey)?;
        Ok(Self(bytes))
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        alloy::hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl From<[u8; KEY_SIZE]> for EncryptionKey {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

fn fill_random(buf: &mut [u8]) -> Result<(), EnvelopeError> {
    SystemRandom::new()
        .fill(buf)
        .map_err(|_| EnvelopeError::Randomness)
}

/// Encrypt `plaintext`, generating a key when none is supplied.
///
/// Returns the envelope together with the key that opens it.
pub fn seal(
    plaintext: &[u8],
    key: Option<EncryptionKey>,
) -> Result<(EncryptionEnvelope, EncryptionKey), EnvelopeError> {
    let key = match key {
        Some(key) => key,
        None => EncryptionKey::generate()?,
    };

    let mut iv = [0u8; IV_SIZE];
    fill_random(&mut iv)?;

    let cipher = Aes256Gcm16::new_from_slice(key.as_bytes()).map_err(|_| EnvelopeError::InvalidKey)?;
    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
        .map_err(|_| EnvelopeError::Encryption)?;

    let mut auth_tag = [0u8; TAG_SIZE];
    auth_tag.copy_from_slice(tag.as_slice());

    Ok((
        EncryptionEnvelope {
            algorithm_id: ALGORITHM_ID.to_string(),
            iv,
            auth_tag,
            ciphertext: buffer,
        },
        key,
    ))
}

/// Decrypt and authenticate an envelope.
///
/// Every failure (wrong key, wrong IV, altered ciphertext or tag, unknown
/// algorithm) is the same [`EnvelopeError::DecryptionFailed`].
pub fn open(envelope: &EncryptionEnvelope, key: &EncryptionKey) -> Result<Vec<u8>, EnvelopeError> {
    if envelope.algorithm_id != ALGORITHM_ID {
        return Err(EnvelopeError::DecryptionFailed);
    }

    let cipher =
        Aes256Gcm16::new_from_slice(key.as_bytes()).map_err(|_| EnvelopeError::DecryptionFailed)?;
    let mut buffer = envelope.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            Nonce::<U16>::from_slice(&envelope.iv),
            b"",
            &mut buffer,
            Tag::<U16>::from_slice(&envelope.auth_tag),
        )
        .map_err(|_| EnvelopeError::DecryptionFailed)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        fill_random(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn seal_then_open_returns_plaintext() {
        for len in [0, 1, 15, 16, 17, 1024, 64 * 1024 + 3] {
            let plaintext = sample(len);
            let (envelope, key) = seal(&plaintext, None).unwrap();
            assert_eq!(envelope.algorithm_id, ALGORITHM_ID);
            assert_eq!(envelope.ciphertext.len(), plaintext.len());
            assert_eq!(open(&envelope, &key).unwrap(), plaintext);
        }
    }

    #[test]
    fn supplied_key_is_used_and_returned() {
        let key = EncryptionKey::from([7u8; KEY_SIZE]);
        let (envelope, returned) = seal(b"lab results", Some(key.clone())).unwrap();
        assert_eq!(returned, key);
        assert_eq!(open(&envelope, &key).unwrap(), b"lab results");
    }

    #[test]
    fn every_seal_uses_a_fresh_iv() {
        let key = EncryptionKey::generate().unwrap();
        let (first, _) = seal(b"same input", Some(key.clone())).unwrap();
        let (second, _) = seal(b"same input", Some(key)).unwrap();
        assert_ne!(first.iv, second.iv);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let (envelope, key) = seal(b"discharge summary", None).unwrap();
        let mut other = *key.as_bytes();
        other[0] ^= 0x01;
        assert_eq!(
            open(&envelope, &EncryptionKey::from(other)),
            Err(EnvelopeError::DecryptionFailed)
        );
        assert_eq!(
            open(&envelope, &EncryptionKey::generate().unwrap()),
            Err(EnvelopeError::DecryptionFailed)
        );
    }

    #[test]
    fn any_flipped_bit_is_rejected() {
        let plaintext = sample(24);
        let (envelope, key) = seal(&plaintext, None).unwrap();

        for byte in 0..envelope.ciphertext.len() {
            for bit in 0..8 {
                let mut tampered = envelope.clone();
                tampered.ciphertext[byte] ^= 1 << bit;
                assert_eq!(open(&tampered, &key), Err(EnvelopeError::DecryptionFailed));
            }
        }
        for byte in 0..TAG_SIZE {
            for bit in 0..8 {
                let mut tampered = envelope.clone();
                tampered.auth_tag[byte] ^= 1 << bit;
                assert_eq!(open(&tampered, &key), Err(EnvelopeError::DecryptionFailed));
            }
        }
        for byte in 0..IV_SIZE {
            let mut tampered = envelope.clone();
            tampered.iv[byte] ^= 0x80;
            assert_eq!(open(&tampered, &key), Err(EnvelopeError::DecryptionFailed));
        }
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let (mut envelope, key) = seal(b"x-ray", None).unwrap();
        envelope.algorithm_id = "chacha20-poly1305".to_string();
        assert_eq!(open(&envelope, &key), Err(EnvelopeError::DecryptionFailed));
    }

    #[test]
    fn key_hex_round_trip_and_length_checks() {
        let key = EncryptionKey::generate().unwrap();
        let hex = key.to_hex();
        assert_eq!(hex.len(), KEY_SIZE * 2);
        assert_eq!(EncryptionKey::from_hex(&hex).unwrap(), key);
        assert_eq!(EncryptionKey::from_hex(&format!("0x{hex}")).unwrap(), key);

        assert_eq!(
            EncryptionKey::from_hex(&hex[..62]),
            Err(EnvelopeError::InvalidKey)
        );
        assert_eq!(
            EncryptionKey::from_hex("zz"),
            Err(EnvelopeError::InvalidKey)
        );
    }

    #[test]
    fn debug_output_hides_key_material() {
        let key = EncryptionKey::from([0xab; KEY_SIZE]);
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("ab"));
        assert!(rendered.contains("redacted"));
    }
}
