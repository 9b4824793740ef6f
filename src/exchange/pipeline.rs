// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pipeline stage tracking.
//!
//! ```text
//! Authenticating -> Validating -> Authorizing -> StoreCheck -> Processing -> Responding
//!        \               \              \             \             \
//!         +---------------+--------------+-------------+-------------+--> Failed(kind)
//! ```
//!
//! There is no retry or rollback stage: each pipeline performs at most one
//! durable write.

use std::fmt;

use crate::{auth::Action, error::ExchangeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authenticating,
    Validating,
    Authorizing,
    StoreCheck,
    Processing,
    Responding,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Authenticating => "authenticating",
            Stage::Validating => "validating",
            Stage::Authorizing => "authorizing",
            Stage::StoreCheck => "store_check",
            Stage::Processing => "processing",
            Stage::Responding => "responding",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current position of one request in its pipeline.
#[derive(Debug)]
pub(crate) struct Pipeline {
    action: Action,
    stage: Stage,
}

impl Pipeline {
    pub(crate) fn start(action: Action) -> Self {
        tracing::debug!(pipeline = %action, stage = %Stage::Authenticating, "Pipeline started");
        Self {
            action,
            stage: Stage::Authenticating,
        }
    }

    /// Continue a pipeline whose earlier stages already passed.
    pub(crate) fn resume(action: Action, stage: Stage) -> Self {
        tracing::debug!(pipeline = %action, stage = %stage, "Pipeline resumed");
        Self { action, stage }
    }

    pub(crate) fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn enter(&mut self, stage: Stage) {
        tracing::debug!(pipeline = %self.action, from = %self.stage, to = %stage, "Pipeline stage");
        self.stage = stage;
    }

    /// Record the terminal failure and hand the error back.
    pub(crate) fn fail(&self, error: ExchangeError) -> ExchangeError {
        match &error {
            ExchangeError::OracleUnavailable(cause)
            | ExchangeError::ServiceUnavailable(cause)
            | ExchangeError::Internal(cause) => tracing::warn!(
                pipeline = %self.action,
                stage = %self.stage,
                error_code = error.error_code(),
                cause = %cause,
                "Pipeline failed"
            ),
            _ => tracing::warn!(
                pipeline = %self.action,
                stage = %self.stage,
                error_code = error.error_code(),
                error = %error,
                "Pipeline failed"
            ),
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_and_fail_preserves_error() {
        let mut pipeline = Pipeline::start(Action::Retrieve);
        assert_eq!(pipeline.stage(), Stage::Authenticating);

        pipeline.enter(Stage::Validating);
        pipeline.enter(Stage::Authorizing);
        assert_eq!(pipeline.stage(), Stage::Authorizing);

        let error = pipeline.fail(ExchangeError::Forbidden("no permission".into()));
        assert!(matches!(error, ExchangeError::Forbidden(reason) if reason == "no permission"));
    }

    #[test]
    fn resume_starts_at_the_given_stage() {
        let pipeline = Pipeline::resume(Action::Upload, Stage::Validating);
        assert_eq!(pipeline.stage(), Stage::Validating);
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::StoreCheck.to_string(), "store_check");
        assert_eq!(Stage::Responding.as_str(), "responding");
    }
}
