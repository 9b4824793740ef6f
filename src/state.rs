// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    blockchain::PermissionOracle, config::DEFAULT_MAX_UPLOAD_BYTES, exchange::RecordExchange,
    storage::ContentStore,
};

#[derive(Clone)]
pub struct AppState {
    pub exchange: Arc<RecordExchange>,
    /// Upper bound on request bodies, applied by the router.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(oracle: Arc<dyn PermissionOracle>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            exchange: Arc::new(RecordExchange::new(oracle, store)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }
}
