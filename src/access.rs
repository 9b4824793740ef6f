// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Record access decisions.
//!
//! Rules, in order:
//!
//! 1. A patient may always read their own records (`self-access`). This is
//!    decided locally and never consults the registry.
//! 2. Anyone else needs a grant from the patient in the registry.
//! 3. A registry failure is a denial.
//!
//! Decisions are computed per request and never cached.

use std::sync::Arc;

use alloy::primitives::Address;
use serde::Serialize;
use utoipa::ToSchema;

use crate::blockchain::PermissionOracle;

pub const REASON_SELF_ACCESS: &str = "self-access";
pub const REASON_GRANTED: &str = "granted";
pub const REASON_NO_PERMISSION: &str = "no permission";

/// Outcome of an access check, with the reason reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AccessDecision {
    pub authorized: bool,
    pub reason: String,
}

impl AccessDecision {
    fn allow(reason: &str) -> Self {
        Self {
            authorized: true,
            reason: reason.to_string(),
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            authorized: false,
            reason: reason.into(),
        }
    }
}

/// Combines self-access with the registry's delegated permissions.
#[derive(Clone)]
pub struct AccessDecisionEngine {
    oracle: Arc<dyn PermissionOracle>,
}

impl AccessDecisionEngine {
    pub fn new(oracle: Arc<dyn PermissionOracle>) -> Self {
        Self { oracle }
    }

    /// Decide whether `requester` may read records owned by `patient`.
    pub async fn decide(&self, requester: Address, patient: Address) -> AccessDecision {
        if requester == patient {
            return AccessDecision::allow(REASON_SELF_ACCESS);
        }

        let decision = match self.oracle.has_permission(patient, requester).await {
            Ok(true) => AccessDecision::allow(REASON_GRANTED),
            Ok(false) => AccessDecision::deny(REASON_NO_PERMISSION),
            Err(e) => AccessDecision::deny(format!("verification failed: {e}")),
        };

        tracing::info!(
            target: "audit",
            requester = %requester,
            patient = %patient,
            authorized = decision.authorized,
            reason = %decision.reason,
            "Record access decision"
        );
        decision
    }
}
