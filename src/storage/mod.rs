// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Content Storage Module
//!
//! Encrypted records live on a content-addressable store. This service
//! writes one framed envelope per upload and reads it back by the address
//! the store assigned; it keeps no durable state of its own.
//!
//! ## Backends
//!
//! - [`IpfsStore`]: Kubo HTTP RPC API (production)
//! - [`MemoryStore`]: process-local map (development and tests)
//!
//! ## Important Notes
//!
//! - Stores only ever receive ciphertext
//! - Store handles are constructed once in `main` and injected

pub mod content;
pub mod ipfs;
pub mod memory;

pub use content::{ContentStore, StoreError};
pub use ipfs::IpfsStore;
pub use memory::MemoryStore;
