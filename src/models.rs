// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the record exchange API. All JSON types
//! use camelCase field names and derive `ToSchema` for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Upload**: multipart form and the one-time receipt
//! - **Retrieve**: JSON request for a stored record
//! - **Status**: store reachability

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Upload Models
// =============================================================================

/// Multipart form accepted by the upload endpoint (documentation only).
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct UploadForm {
    /// The record to encrypt and store.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Wallet address of the patient the record belongs to.
    pub patient_address: String,
}

/// Details about an uploaded record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    /// Plaintext size in bytes.
    pub original_size: usize,
    /// Patient the record belongs to (checksummed).
    pub patient_address: String,
    /// Issuer that uploaded the record (checksummed, recovered from the signature).
    pub requester_address: String,
    /// Envelope cipher.
    pub algorithm_id: String,
    /// Content type declared by the uploader, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Original file name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// When the record was stored.
    pub uploaded_at: DateTime<Utc>,
}

/// Response after uploading a record.
///
/// `key` is returned exactly once. The server does not keep it; losing it
/// makes the record unreadable.
#[derive(Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    /// Content address of the encrypted record.
    pub storage_address: String,
    /// Hex-encoded 256-bit decryption key.
    pub key: String,
    pub metadata: RecordMetadata,
}

impl fmt::Debug for UploadReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadReceipt")
            .field("storage_address", &self.storage_address)
            .field("key", &"<redacted>")
            .field("metadata", &self.metadata)
            .finish()
    }
}

// =============================================================================
// Retrieve Models
// =============================================================================

/// Request to fetch and decrypt a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveRequest {
    /// Content address returned by the upload.
    #[serde(default)]
    pub storage_address: Option<String>,
    /// Hex-encoded decryption key returned by the upload.
    #[serde(default)]
    pub key: Option<String>,
    /// Patient the record belongs to.
    #[serde(default)]
    pub patient_address: Option<String>,
    /// File name to suggest in `Content-Disposition`.
    #[serde(default)]
    pub file_name: Option<String>,
}

// =============================================================================
// Status Models
// =============================================================================

/// Content store reachability.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Store backend ("ipfs" or "memory").
    pub store: String,
    /// Whether the store answered the probe.
    pub store_available: bool,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
