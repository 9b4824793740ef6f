// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Upload pipeline.

use std::sync::Arc;

use chrono::Utc;

use super::{patient_address, pipeline::Pipeline, store_error, RecordExchange, Stage};
use crate::{
    auth::{Action, SignedRequest, VerifiedIdentity},
    envelope,
    error::ExchangeError,
    models::{RecordMetadata, UploadReceipt},
};

/// Parameters of an upload, as received.
///
/// Fields are optional so that missing parameters are reported by the
/// validation stage, after authentication.
#[derive(Debug, Clone, Default)]
pub struct UploadInput {
    pub file: Option<Vec<u8>>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub patient_address: Option<String>,
}

impl RecordExchange {
    /// Encrypt a record for a patient and store it.
    ///
    /// Only verified issuers may upload. The returned receipt holds the only
    /// copy of the decryption key.
    pub async fn upload(
        &self,
        request: &SignedRequest,
        input: UploadInput,
    ) -> Result<UploadReceipt, ExchangeError> {
        let identity = self.authenticate(request, Action::Upload)?;
        self.upload_as(identity, input).await
    }

    /// Run the upload stages after [`RecordExchange::authenticate`].
    pub async fn upload_as(
        &self,
        identity: VerifiedIdentity,
        input: UploadInput,
    ) -> Result<UploadReceipt, ExchangeError> {
        let mut pipeline = Pipeline::resume(Action::Upload, Stage::Validating);
        if identity.action != Action::Upload {
            return Err(pipeline.fail(ExchangeError::ActionMismatch {
                expected: Action::Upload,
                actual: identity.action,
            }));
        }

        let file = match input.file {
            Some(file) if !file.is_empty() => file,
            _ => {
                return Err(pipeline.fail(ExchangeError::ParamsMissing(
                    "file is required".to_string(),
                )))
            }
        };
        let patient =
            patient_address(input.patient_address.as_deref()).map_err(|e| pipeline.fail(e))?;

        pipeline.enter(Stage::Authorizing);
        match self.oracle.is_verified_issuer(identity.address).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(pipeline.fail(ExchangeError::Forbidden(
                    "not a verified issuer".to_string(),
                )))
            }
            Err(e) => return Err(pipeline.fail(ExchangeError::OracleUnavailable(e.to_string()))),
        }

        pipeline.enter(Stage::StoreCheck);
        self.ensure_store_available()
            .await
            .map_err(|e| pipeline.fail(e))?;

        pipeline.enter(Stage::Processing);
        let original_size = file.len();
        let (sealed, key) = envelope::seal(&file, None)
            .map_err(|e| pipeline.fail(ExchangeError::Internal(e.to_string())))?;
        drop(file);
        let blob = envelope::frame(&sealed)
            .map_err(|e| pipeline.fail(ExchangeError::Internal(e.to_string())))?;

        // The write runs on its own task so it completes even if the client
        // goes away; the blob is inert until someone holds the key.
        let store = Arc::clone(&self.store);
        let storage_address = tokio::spawn(async move { store.put(blob).await })
            .await
            .map_err(|e| pipeline.fail(ExchangeError::Internal(format!("store task: {e}"))))?
            .map_err(|e| pipeline.fail(store_error(e)))?;

        pipeline.enter(Stage::Responding);
        let receipt = UploadReceipt {
            storage_address,
            key: key.to_hex(),
            metadata: RecordMetadata {
                original_size,
                patient_address: patient.to_checksum(None),
                requester_address: identity.checksummed(),
                algorithm_id: sealed.algorithm_id,
                content_type: input.content_type,
                file_name: input.file_name,
                uploaded_at: Utc::now(),
            },
        };

        tracing::info!(
            target: "audit",
            requester = %receipt.metadata.requester_address,
            patient = %receipt.metadata.patient_address,
            storage_address = %receipt.storage_address,
            size = original_size,
            "Record uploaded"
        );
        Ok(receipt)
    }
}
