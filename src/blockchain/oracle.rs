// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission oracle interface.
//!
//! The ledger is the system of record for who may issue records and who
//! a patient has granted read access to. This service only reads those
//! facts; every call goes to the ledger, nothing is cached, so a revoked
//! grant denies the very next request.

use std::time::Duration;

use alloy::primitives::Address;
use async_trait::async_trait;

/// Read-only access to the permission registry.
///
/// Implementations perform no retries; a failed or timed-out call is an
/// [`OracleError`] and the caller decides what to do with it.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    /// Whether `address` may create records.
    async fn is_verified_issuer(&self, address: Address) -> Result<bool, OracleError>;

    /// Whether `patient` has granted `requester` read access.
    async fn has_permission(&self, patient: Address, requester: Address)
        -> Result<bool, OracleError>;
}

/// Errors that can occur while querying the registry.
///
/// `Display` stays generic because denial reasons reach callers. Transport
/// detail (which may include an RPC URL with credentials) is only kept in
/// the variant payload and in logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("registry unavailable")]
    Unavailable(String),

    #[error("registry timed out")]
    Timeout(Duration),

    #[error("invalid registry configuration: {0}")]
    InvalidConfig(String),
}
