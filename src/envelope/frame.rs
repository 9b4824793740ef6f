// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storage object framing.
//!
//! ```text
//! +----------------+-----------------------------------------+-------------+
//! | u32 BE: hdrlen | JSON {"algorithmId","iv","authTag"}     | ciphertext  |
//! +----------------+-----------------------------------------+-------------+
//! ```
//!
//! `iv` and `authTag` are lowercase hex. The whole frame is written to the
//! content store as one blob.

use serde::{Deserialize, Serialize};

use super::{
    cipher::{IV_SIZE, TAG_SIZE},
    EncryptionEnvelope, EnvelopeError,
};

/// Bytes used by the header length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Upper bound on the JSON header; anything larger is not one of ours.
pub const MAX_HEADER_SIZE: usize = 4096;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameHeader {
    algorithm_id: String,
    iv: String,
    auth_tag: String,
}

/// Serialize an envelope into a single storage blob.
pub fn frame(envelope: &EncryptionEnvelope) -> Result<Vec<u8>, EnvelopeError> {
    let header = FrameHeader {
        algorithm_id: envelope.algorithm_id.clone(),
        iv: alloy::hex::encode(envelope.iv),
        auth_tag: alloy::hex::encode(envelope.auth_tag),
    };
    let header = serde_json::to_vec(&header)
        .map_err(|e| EnvelopeError::InvalidHeader(e.to_string()))?;
    let header_len = u32::try_from(header.len())
        .map_err(|_| EnvelopeError::InvalidHeader("header too large".to_string()))?;

    let mut out =
        Vec::with_capacity(LENGTH_PREFIX_SIZE + header.len() + envelope.ciphertext.len());
    out.extend_from_slice(&header_len.to_be_bytes());
    out.extend_from_slice(&header);
    out.extend_from_slice(&envelope.ciphertext);
    Ok(out)
}

/// Parse a storage blob back into an envelope.
pub fn unframe(bytes: &[u8]) -> Result<EncryptionEnvelope, EnvelopeError> {
    let (prefix, rest) = bytes
        .split_first_chunk::<LENGTH_PREFIX_SIZE>()
        .ok_or(EnvelopeError::Truncated)?;
    let header_len = u32::from_be_bytes(*prefix) as usize;

    if header_len == 0 || header_len > MAX_HEADER_SIZE {
        return Err(EnvelopeError::InvalidHeader(format!(
            "header length {header_len} out of range"
        )));
    }
    if rest.len() < header_len {
        return Err(EnvelopeError::Truncated);
    }

    let (header, ciphertext) = rest.split_at(header_len);
    let header: FrameHeader = serde_json::from_slice(header)
        .map_err(|e| EnvelopeError::InvalidHeader(e.to_string()))?;

    Ok(EncryptionEnvelope {
        algorithm_id: header.algorithm_id,
        iv: decode_fixed::<IV_SIZE>(&header.iv, "iv")?,
        auth_tag: decode_fixed::<TAG_SIZE>(&header.auth_tag, "authTag")?,
        ciphertext: ciphertext.to_vec(),
    })
}

fn decode_fixed<const N: usize>(hex: &str, field: &str) -> Result<[u8; N], EnvelopeError> {
    alloy::hex::decode(hex)
        .ok()
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or_else(|| EnvelopeError::InvalidHeader(format!("{field} must be {N} hex bytes")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{open, seal};

    #[test]
    fn frame_layout_is_length_prefixed_json_then_ciphertext() {
        let (envelope, _) = seal(b"prescription", None).unwrap();
        let bytes = frame(&envelope).unwrap();

        let header_len = u32::from_be_bytes(bytes[..4].try_into().unwrap()) as usize;
        let header: serde_json::Value =
            serde_json::from_slice(&bytes[4..4 + header_len]).unwrap();
        assert_eq!(header["algorithmId"], "aes-256-gcm");
        assert_eq!(header["iv"], alloy::hex::encode(envelope.iv));
        assert_eq!(header["authTag"], alloy::hex::encode(envelope.auth_tag));
        assert_eq!(&bytes[4 + header_len..], envelope.ciphertext.as_slice());
    }

    #[test]
    fn unframe_inverts_frame() {
        for plaintext in [&b""[..], &b"a"[..], &[0x42u8; 4096][..]] {
            let (envelope, key) = seal(plaintext, None).unwrap();
            let restored = unframe(&frame(&envelope).unwrap()).unwrap();
            assert_eq!(restored, envelope);
            assert_eq!(open(&restored, &key).unwrap(), plaintext);
        }
    }

    #[test]
    fn flipped_bit_in_framed_ciphertext_fails_to_open() {
        let (envelope, key) = seal(&[9u8; 64], None).unwrap();
        let mut bytes = frame(&envelope).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        let tampered = unframe(&bytes).unwrap();
        assert!(open(&tampered, &key).is_err());
    }

    #[test]
    fn short_inputs_fail_fast() {
        assert_eq!(unframe(&[]), Err(EnvelopeError::Truncated));
        assert_eq!(unframe(&[0, 0, 1]), Err(EnvelopeError::Truncated));
        assert_eq!(unframe(&[0, 0, 0, 10, b'{']), Err(EnvelopeError::Truncated));
    }

    #[test]
    fn garbled_headers_are_rejected() {
        assert!(matches!(
            unframe(&[0, 0, 0, 0]),
            Err(EnvelopeError::InvalidHeader(_))
        ));
        assert!(matches!(
            unframe(&[0xff, 0xff, 0xff, 0xff, 0]),
            Err(EnvelopeError::InvalidHeader(_))
        ));

        let mut bytes = 8u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(b"not json");
        assert!(matches!(unframe(&bytes), Err(EnvelopeError::InvalidHeader(_))));

        let header = br#"{"algorithmId":"aes-256-gcm","iv":"00ff","authTag":"00"}"#;
        let mut bytes = (header.len() as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(header);
        assert!(matches!(unframe(&bytes), Err(EnvelopeError::InvalidHeader(_))));
    }
}
