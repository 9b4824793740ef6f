// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet helpers for tests.

use alloy::{
    primitives::Address,
    signers::{local::PrivateKeySigner, SignerSync},
};
use chrono::Utc;

use super::{
    verifier::{signing_message, SIGNING_NAMESPACE},
    Action, SignedRequest, ACTION_HEADER, ADDRESS_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};

/// A throwaway secp256k1 wallet that signs requests the way a client does.
pub struct TestWallet {
    signer: PrivateKeySigner,
}

impl TestWallet {
    pub fn random() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn sign(&self, action: Action, timestamp: i64) -> SignedRequest {
        let mut request = SignedRequest {
            claimed_address: self.address().to_checksum(None),
            signature: String::new(),
            timestamp,
            action,
        };
        let message = signing_message(SIGNING_NAMESPACE, &request);
        let signature = self
            .signer
            .sign_message_sync(message.as_bytes())
            .expect("signing with a local key cannot fail");
        request.signature = alloy::hex::encode_prefixed(signature.as_bytes());
        request
    }

    pub fn sign_now(&self, action: Action) -> SignedRequest {
        self.sign(action, Utc::now().timestamp())
    }

    /// Header pairs for a request signed right now.
    pub fn headers(&self, action: Action) -> Vec<(&'static str, String)> {
        header_pairs(&self.sign_now(action))
    }
}

/// The signing headers a client would send for `request`.
pub fn header_pairs(request: &SignedRequest) -> Vec<(&'static str, String)> {
    vec![
        (ADDRESS_HEADER, request.claimed_address.clone()),
        (SIGNATURE_HEADER, request.signature.clone()),
        (TIMESTAMP_HEADER, request.timestamp.to_string()),
        (ACTION_HEADER, request.action.to_string()),
    ]
}
