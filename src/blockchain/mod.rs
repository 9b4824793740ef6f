// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration for the record permission registry.
//!
//! This module provides:
//! - The [`PermissionOracle`] interface the exchange depends on
//! - An EVM JSON-RPC client for the registry contract
//! - An in-memory registry for development and tests

pub mod memory;
pub mod oracle;
pub mod registry;

pub use memory::InMemoryRegistry;
pub use oracle::{OracleError, PermissionOracle};
pub use registry::RegistryClient;
