// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    access::AccessDecision,
    auth::Action,
    models::{
        HealthResponse, RecordMetadata, RetrieveRequest, StatusResponse, UploadForm,
        UploadReceipt,
    },
    state::AppState,
};

pub mod health;
pub mod records;

pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    let v1_routes = Router::new()
        .route("/records", post(records::upload_record))
        .route("/records/retrieve", post(records::retrieve_record))
        .route("/status", get(health::status))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    Router::new()
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        records::upload_record,
        records::retrieve_record,
        health::status,
        health::liveness
    ),
    components(
        schemas(
            Action,
            AccessDecision,
            UploadForm,
            UploadReceipt,
            RecordMetadata,
            RetrieveRequest,
            StatusResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "Records", description = "Encrypted record upload and retrieval"),
        (name = "Health", description = "Service and content store status")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use crate::{blockchain::InMemoryRegistry, storage::MemoryStore};

    fn app() -> Router {
        router(AppState::new(
            Arc::new(InMemoryRegistry::new()),
            Arc::new(MemoryStore::new()),
        ))
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        // Ensure the router can be converted into a service without panicking.
        let _ = app().into_make_service();
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[test]
    fn openapi_lists_record_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/v1/records"));
        assert!(doc.paths.paths.contains_key("/v1/records/retrieve"));
        assert!(doc.paths.paths.contains_key("/v1/status"));
    }
}
