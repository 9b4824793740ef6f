// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Content-addressable store interface.

use async_trait::async_trait;

/// A blob store that assigns addresses to what it stores.
///
/// The store never sees plaintext: the exchange only hands it framed
/// envelopes. Handles are built once at startup and shared.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Whether the store currently answers requests.
    async fn is_available(&self) -> bool;

    /// Store `blob` and return its content address.
    async fn put(&self, blob: Vec<u8>) -> Result<String, StoreError>;

    /// Fetch the blob stored under `address`.
    async fn get(&self, address: &str) -> Result<Vec<u8>, StoreError>;

    /// Short name for logs and the status endpoint.
    fn kind(&self) -> &'static str;
}

/// Errors returned by content stores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    #[error("content store rejected request: {0}")]
    Rejected(String),

    #[error("no object stored at {0}")]
    NotFound(String),

    #[error("invalid content store configuration: {0}")]
    InvalidConfig(String),
}
