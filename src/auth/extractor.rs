// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for signed requests.
//!
//! The extractor only reads the signing headers. Verification is part of
//! the exchange pipeline so that it runs as the first pipeline stage.
//!
//! ```rust,ignore
//! async fn my_handler(Signed(request): Signed) -> impl IntoResponse {
//!     // request is SignedRequest
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, SignedRequest};

/// Extractor for the wallet signing headers.
pub struct Signed(pub SignedRequest);

impl<S> FromRequestParts<S> for Signed
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        SignedRequest::from_headers(&parts.headers).map(Signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{testing::TestWallet, Action};
    use axum::http::Request;

    #[tokio::test]
    async fn signed_extractor_requires_headers() {
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Signed::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::HeadersMissing)));
    }

    #[tokio::test]
    async fn signed_extractor_reads_headers() {
        let wallet = TestWallet::random();
        let mut builder = Request::builder().uri("/test");
        for (name, value) in wallet.headers(Action::Upload) {
            builder = builder.header(name, value);
        }
        let mut parts = builder.body(()).unwrap().into_parts().0;

        let Signed(request) = Signed::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(request.action, Action::Upload);
        assert_eq!(request.claimed_address, wallet.address().to_checksum(None));
    }
}
