// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-local permission registry.
//!
//! Used when no chain is configured (development) and as a test double.
//! It answers exactly like the contract: issuers are a set, grants are
//! `(patient, requester)` pairs.

use std::{
    collections::HashSet,
    sync::atomic::{AtomicBool, Ordering},
};

use alloy::primitives::Address;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::oracle::{OracleError, PermissionOracle};

#[derive(Debug)]
pub struct InMemoryRegistry {
    issuers: RwLock<HashSet<Address>>,
    grants: RwLock<HashSet<(Address, Address)>>,
    available: AtomicBool,
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            issuers: RwLock::new(HashSet::new()),
            grants: RwLock::new(HashSet::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Seed verified issuers.
    pub fn with_issuers(issuers: impl IntoIterator<Item = Address>) -> Self {
        Self {
            issuers: RwLock::new(issuers.into_iter().collect()),
            ..Self::new()
        }
    }

    pub async fn add_issuer(&self, address: Address) {
        self.issuers.write().await.insert(address);
    }

    pub async fn remove_issuer(&self, address: Address) {
        self.issuers.write().await.remove(&address);
    }

    /// Patient grants requester read access.
    pub async fn grant(&self, patient: Address, requester: Address) {
        self.grants.write().await.insert((patient, requester));
    }

    /// Patient revokes requester read access.
    pub async fn revoke(&self, patient: Address, requester: Address) {
        self.grants.write().await.remove(&(patient, requester));
    }

    /// Simulate the ledger going away (every query fails while unset).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), OracleError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(OracleError::Unavailable("in-memory registry offline".to_string()))
        }
    }
}

#[async_trait]
impl PermissionOracle for InMemoryRegistry {
    async fn is_verified_issuer(&self, address: Address) -> Result<bool, OracleError> {
        self.ensure_available()?;
        Ok(self.issuers.read().await.contains(&address))
    }

    async fn has_permission(
        &self,
        patient: Address,
        requester: Address,
    ) -> Result<bool, OracleError> {
        self.ensure_available()?;
        Ok(self.grants.read().await.contains(&(patient, requester)))
    }
}
