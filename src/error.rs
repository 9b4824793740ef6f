// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::{Action, AuthError};

/// Terminal failure of an upload or retrieve pipeline.
///
/// Upstream causes are kept for logs but not rendered to callers.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Signed action `{actual}` cannot be used for `{expected}`")]
    ActionMismatch { expected: Action, actual: Action },

    #[error("Missing or invalid parameter: {0}")]
    ParamsMissing(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Permission registry temporarily unavailable")]
    OracleUnavailable(String),

    #[error("Content store temporarily unavailable")]
    ServiceUnavailable(String),

    #[error("Record could not be decrypted")]
    DecryptionFailed,

    #[error("Record not found")]
    RecordNotFound,

    #[error("Internal error")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl ExchangeError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExchangeError::Auth(e) => e.error_code(),
            ExchangeError::ActionMismatch { .. } => "action_mismatch",
            ExchangeError::ParamsMissing(_) => "params_missing",
            ExchangeError::Forbidden(_) => "forbidden",
            ExchangeError::OracleUnavailable(_) => "oracle_unavailable",
            ExchangeError::ServiceUnavailable(_) => "service_unavailable",
            ExchangeError::DecryptionFailed => "decryption_failed",
            ExchangeError::RecordNotFound => "record_not_found",
            ExchangeError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExchangeError::Auth(e) => e.status_code(),
            ExchangeError::ActionMismatch { .. } | ExchangeError::ParamsMissing(_) => {
                StatusCode::BAD_REQUEST
            }
            ExchangeError::Forbidden(_) => StatusCode::FORBIDDEN,
            ExchangeError::OracleUnavailable(_) | ExchangeError::ServiceUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ExchangeError::DecryptionFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ExchangeError::RecordNotFound => StatusCode::NOT_FOUND,
            ExchangeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Denial reason for `Forbidden`, surfaced so the caller knows why.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ExchangeError::Forbidden(reason) => Some(reason),
            _ => None,
        }
    }
}

impl IntoResponse for ExchangeError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
            reason: self.reason().map(str::to_string),
        });
        (self.status_code(), body).into_response()
    }
}
