// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet signature verification.
//!
//! A caller signs the UTF-8 string `{namespace}:{action}:{timestamp}` with
//! `personal_sign` (EIP-191). The server rebuilds the same string from the
//! claimed action and timestamp, recovers the signer, and compares it with
//! the claimed address. Because the action is part of the signed bytes, a
//! signature for `upload` cannot be replayed as `retrieve`.
//!
//! ## Replay window
//!
//! Freshness is a symmetric window of [`FRESHNESS_WINDOW_SECS`] around the
//! server clock; a timestamp exactly on the boundary is accepted. There is no
//! nonce tracking, so a captured signature stays valid for the rest of its
//! window.

use std::str::FromStr;

use alloy::primitives::{Address, Signature};
use chrono::Utc;

use super::{AuthError, SignedRequest, VerifiedIdentity};

/// Namespace prefixed to every signed message. Shared with clients.
pub const SIGNING_NAMESPACE: &str = "RecordExchange";

/// Accepted clock skew in either direction, in seconds.
pub const FRESHNESS_WINDOW_SECS: i64 = 300;

/// Build the exact message a client signs.
pub fn signing_message(namespace: &str, request: &SignedRequest) -> String {
    format!("{namespace}:{}:{}", request.action, request.timestamp)
}

/// Checks signed request headers against the server clock.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    namespace: String,
    window_secs: i64,
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self::new(SIGNING_NAMESPACE)
    }
}

impl SignatureVerifier {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            window_secs: FRESHNESS_WINDOW_SECS,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Verify against the current wall clock.
    pub fn verify(&self, request: &SignedRequest) -> Result<VerifiedIdentity, AuthError> {
        self.verify_at(request, Utc::now().timestamp())
    }

    /// Verify against an explicit `now` (unix seconds).
    pub fn verify_at(
        &self,
        request: &SignedRequest,
        now: i64,
    ) -> Result<VerifiedIdentity, AuthError> {
        let skew = now.saturating_sub(request.timestamp).saturating_abs();
        if skew > self.window_secs {
            tracing::debug!(skew, action = %request.action, "Rejected stale signature");
            return Err(AuthError::Expired);
        }

        let claimed =
            Address::from_str(request.claimed_address.trim()).map_err(|_| AuthError::Malformed)?;

        let signature_bytes =
            alloy::hex::decode(request.signature.trim()).map_err(|_| AuthError::Malformed)?;
        let signature =
            Signature::try_from(signature_bytes.as_slice()).map_err(|_| AuthError::Malformed)?;

        let message = signing_message(&self.namespace, request);
        let recovered = signature
            .recover_address_from_msg(message.as_bytes())
            .map_err(|_| AuthError::Malformed)?;

        // Address equality is byte equality, so hex case is irrelevant here.
        if recovered != claimed {
            tracing::debug!(
                claimed = %claimed,
                recovered = %recovered,
                "Recovered signer does not match claimed address"
            );
            return Err(AuthError::SignatureMismatch);
        }

        let identity = VerifiedIdentity {
            address: recovered,
            action: request.action,
        };
        tracing::info!(
            principal = %identity.checksummed(),
            action = %identity.action,
            "Authenticated wallet request"
        );
        Ok(identity)
    }
}
