// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory content store.
//!
//! Addresses are `sha256-<hex>` of the blob, so identical blobs share an
//! address just as they would on IPFS.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use super::content::{ContentStore, StoreError};

#[derive(Debug)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Content address for `blob`.
    pub fn address_of(blob: &[u8]) -> String {
        format!("sha256-{}", alloy::hex::encode(Sha256::digest(blob)))
    }

    /// Simulate an outage.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    /// Overwrite a stored blob in place (tests use this to simulate a
    /// misbehaving store).
    pub async fn replace(&self, address: &str, blob: Vec<u8>) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().await;
        match blobs.get_mut(address) {
            Some(existing) => {
                *existing = blob;
                Ok(())
            }
            None => Err(StoreError::NotFound(address.to_string())),
        }
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn put(&self, blob: Vec<u8>) -> Result<String, StoreError> {
        self.ensure_available()?;
        let address = Self::address_of(&blob);
        self.blobs.write().await.insert(address.clone(), blob);
        Ok(address)
    }

    async fn get(&self, address: &str) -> Result<Vec<u8>, StoreError> {
        self.ensure_available()?;
        self.blobs
            .read()
            .await
            .get(address)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(address.to_string()))
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
