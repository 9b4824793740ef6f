// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Wallet signature authentication error.
///
/// Every variant maps to `401 Unauthorized`. The variants only exist so the
/// caller (and the logs) can tell which check rejected the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// One of the address, signature, timestamp or action headers is absent
    #[error("Signed request headers are required")]
    HeadersMissing,
    /// Timestamp is outside the accepted clock-skew window
    #[error("Signed request has expired")]
    Expired,
    /// Signature, address, timestamp or action could not be decoded
    #[error("Signed request is malformed")]
    Malformed,
    /// Recovered signer differs from the claimed address
    #[error("Signature does not match the claimed address")]
    SignatureMismatch,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::HeadersMissing => "headers_missing",
            AuthError::Expired => "expired",
            AuthError::Malformed => "malformed",
            AuthError::SignatureMismatch => "signature_mismatch",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
