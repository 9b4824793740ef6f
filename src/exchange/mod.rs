// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Record Exchange
//!
//! Composes signature verification, access control, the envelope codec and
//! the content store into the two request pipelines:
//!
//! - **Upload**: verified issuer seals a record for a patient; the caller
//!   receives the content address and the one-time key.
//! - **Retrieve**: the patient, or someone the patient granted access to,
//!   fetches and decrypts a record with the key.
//!
//! Nothing here holds state between requests. Keys are never stored or
//! logged.

pub mod pipeline;
mod retrieve;
mod upload;

use std::{str::FromStr, sync::Arc};

use alloy::primitives::Address;

use self::pipeline::Pipeline;
use crate::{
    access::AccessDecisionEngine,
    auth::{Action, SignatureVerifier, SignedRequest, VerifiedIdentity},
    blockchain::PermissionOracle,
    error::ExchangeError,
    storage::{ContentStore, StoreError},
};

pub use pipeline::Stage;
pub use retrieve::{RetrieveInput, RetrievedRecord};
pub use upload::UploadInput;

/// The upload/retrieve orchestrator.
///
/// Constructed once at startup with the store and registry handles and
/// shared by every request.
#[derive(Clone)]
pub struct RecordExchange {
    verifier: SignatureVerifier,
    oracle: Arc<dyn PermissionOracle>,
    access: AccessDecisionEngine,
    store: Arc<dyn ContentStore>,
}

impl RecordExchange {
    pub fn new(oracle: Arc<dyn PermissionOracle>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            verifier: SignatureVerifier::default(),
            access: AccessDecisionEngine::new(Arc::clone(&oracle)),
            oracle,
            store,
        }
    }

    /// Replace the signature verifier (e.g. a different namespace).
    pub fn with_verifier(mut self, verifier: SignatureVerifier) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Verify the signature and check it was made for `expected`.
    ///
    /// This is the first pipeline stage. It is public so that the HTTP
    /// layer can reject a caller before reading a request body.
    pub fn authenticate(
        &self,
        request: &SignedRequest,
        expected: Action,
    ) -> Result<VerifiedIdentity, ExchangeError> {
        let pipeline = Pipeline::start(expected);
        let identity = self
            .verifier
            .verify(request)
            .map_err(|e| pipeline.fail(e.into()))?;
        if identity.action != expected {
            return Err(pipeline.fail(ExchangeError::ActionMismatch {
                expected,
                actual: identity.action,
            }));
        }
        Ok(identity)
    }

    async fn ensure_store_available(&self) -> Result<(), ExchangeError> {
        if self.store.is_available().await {
            Ok(())
        } else {
            Err(ExchangeError::ServiceUnavailable(format!(
                "{} store is unreachable",
                self.store.kind()
            )))
        }
    }
}

/// Parse the patient address parameter.
fn patient_address(raw: Option<&str>) -> Result<Address, ExchangeError> {
    let raw = required(raw, "patientAddress")?;
    Address::from_str(raw).map_err(|_| {
        ExchangeError::ParamsMissing("patientAddress must be a 20-byte hex address".to_string())
    })
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, ExchangeError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ExchangeError::ParamsMissing(format!("{name} is required")))
}

fn store_error(error: StoreError) -> ExchangeError {
    match error {
        StoreError::NotFound(_) => ExchangeError::RecordNotFound,
        other => ExchangeError::ServiceUnavailable(other.to_string()),
    }
}
