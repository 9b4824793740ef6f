// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use crate::models::{HealthResponse, StatusResponse};
use crate::state::AppState;

/// Content store status handler.
///
/// Reports whether the content store answers. Nothing about the registry,
/// the caller, or stored records is disclosed. Returns 503 when the store
/// is unreachable.
#[utoipa::path(
    get,
    path = "/v1/status",
    tag = "Health",
    responses(
        (status = 200, description = "Content store reachable", body = StatusResponse),
        (status = 503, description = "Content store unreachable", body = StatusResponse)
    )
)]
pub async fn status(State(state): State<AppState>) -> (StatusCode, Json<StatusResponse>) {
    let store = state.exchange.store();
    let available = store.is_available().await;

    let response = StatusResponse {
        status: if available { "ok" } else { "degraded" }.to_string(),
        store: store.kind().to_string(),
        store_available: available,
    };

    let status = if available {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
/// Does not check dependencies - use `/v1/status` for that.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::{blockchain::InMemoryRegistry, storage::MemoryStore};

    #[tokio::test]
    async fn status_follows_store_availability() {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(Arc::new(InMemoryRegistry::new()), store.clone());

        let (code, Json(body)) = status(State(state.clone())).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.store, "memory");
        assert!(body.store_available);

        store.set_available(false);
        let (code, Json(body)) = status(State(state)).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert!(!body.store_available);
    }

    #[tokio::test]
    async fn liveness_is_always_ok() {
        let Json(body) = liveness().await;
        assert_eq!(body.status, "ok");
    }
}
