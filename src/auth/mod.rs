// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Wallet signature authentication for the record exchange API.
//!
//! ## Auth Flow
//!
//! 1. Client signs `{namespace}:{action}:{timestamp}` with its wallet
//!    (`personal_sign`)
//! 2. Client sends `x-wallet-address`, `x-signature`, `x-timestamp`,
//!    `x-action`
//! 3. Server:
//!    - Rejects timestamps more than 300 seconds from its clock
//!    - Rebuilds the message from the claimed action and timestamp
//!    - Recovers the signer and compares it with the claimed address
//!    - Continues with the **recovered** address only

pub mod error;
pub mod extractor;
pub mod request;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use error::AuthError;
pub use extractor::Signed;
pub use request::{
    Action, SignedRequest, VerifiedIdentity, ACTION_HEADER, ADDRESS_HEADER, SIGNATURE_HEADER,
    TIMESTAMP_HEADER,
};
pub use verifier::{SignatureVerifier, FRESHNESS_WINDOW_SECS, SIGNING_NAMESPACE};
