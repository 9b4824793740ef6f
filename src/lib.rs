// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Record Exchange - Wallet-Authenticated Encrypted Record Service
//!
//! This crate lets verified issuers upload medical records for a patient and
//! lets the patient, or anyone the patient has granted access to on-chain,
//! retrieve them. Records are sealed with AES-256-GCM before they reach the
//! content store; the key goes back to the uploader and is never kept.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Wallet signature authentication (EIP-191)
//! - `access` - Access decisions (self-access, registry grants)
//! - `blockchain` - Permission registry client (EVM)
//! - `envelope` - AES-GCM envelope codec and wire framing
//! - `exchange` - Upload and retrieve pipelines
//! - `storage` - Content-addressable stores (IPFS, in-memory)

pub mod access;
pub mod api;
pub mod auth;
pub mod blockchain;
pub mod config;
pub mod envelope;
pub mod error;
pub mod exchange;
pub mod models;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
