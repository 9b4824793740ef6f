// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Retrieve pipeline.

use super::{patient_address, pipeline::Pipeline, required, store_error, RecordExchange, Stage};
use crate::{
    access::AccessDecision,
    auth::{Action, SignedRequest},
    envelope::{self, EncryptionKey},
    error::ExchangeError,
};

/// Parameters of a retrieve, as received.
#[derive(Debug, Clone, Default)]
pub struct RetrieveInput {
    pub storage_address: Option<String>,
    pub key: Option<String>,
    pub patient_address: Option<String>,
}

/// A decrypted record and the decision that released it.
#[derive(Debug)]
pub struct RetrievedRecord {
    pub storage_address: String,
    pub bytes: Vec<u8>,
    pub decision: AccessDecision,
}

impl RecordExchange {
    /// Fetch and decrypt a patient's record.
    ///
    /// Access is decided fresh on every call. Decryption failures never
    /// return partial data and never say whether the key or the data was
    /// at fault.
    pub async fn retrieve(
        &self,
        request: &SignedRequest,
        input: RetrieveInput,
    ) -> Result<RetrievedRecord, ExchangeError> {
        let identity = self.authenticate(request, Action::Retrieve)?;

        let mut pipeline = Pipeline::resume(Action::Retrieve, Stage::Validating);
        let storage_address = required(input.storage_address.as_deref(), "storageAddress")
            .map_err(|e| pipeline.fail(e))?
            .to_string();
        let key = required(input.key.as_deref(), "key").map_err(|e| pipeline.fail(e))?;
        let patient =
            patient_address(input.patient_address.as_deref()).map_err(|e| pipeline.fail(e))?;

        pipeline.enter(Stage::Authorizing);
        let decision = self.access.decide(identity.address, patient).await;
        if !decision.authorized {
            return Err(pipeline.fail(ExchangeError::Forbidden(decision.reason)));
        }

        pipeline.enter(Stage::StoreCheck);
        self.ensure_store_available()
            .await
            .map_err(|e| pipeline.fail(e))?;

        pipeline.enter(Stage::Processing);
        let key = EncryptionKey::from_hex(key)
            .map_err(|_| pipeline.fail(ExchangeError::DecryptionFailed))?;
        let blob = self
            .store
            .get(&storage_address)
            .await
            .map_err(|e| pipeline.fail(store_error(e)))?;
        let bytes = envelope::unframe(&blob)
            .and_then(|sealed| envelope::open(&sealed, &key))
            .map_err(|_| pipeline.fail(ExchangeError::DecryptionFailed))?;

        pipeline.enter(Stage::Responding);
        tracing::info!(
            target: "audit",
            requester = %identity.checksummed(),
            patient = %patient.to_checksum(None),
            storage_address = %storage_address,
            reason = %decision.reason,
            "Record retrieved"
        );
        Ok(RetrievedRecord {
            storage_address,
            bytes,
            decision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::testing::TestWallet,
        exchange::tests::{harness, retrieve_input, upload_input, Harness},
        models::UploadReceipt,
        storage::ContentStore,
    };

    struct Uploaded {
        h: Harness,
        patient: TestWallet,
        receipt: UploadReceipt,
    }

    async fn uploaded(file: &[u8]) -> Uploaded {
        let h = harness();
        let doctor = TestWallet::random();
        let patient = TestWallet::random();
        h.registry.add_issuer(doctor.address()).await;
        let receipt = h
            .exchange
            .upload(
                &doctor.sign_now(Action::Upload),
                upload_input(file.to_vec(), patient.address()),
            )
            .await
            .unwrap();
        Uploaded {
            h,
            patient,
            receipt,
        }
    }

    #[tokio::test]
    async fn wrong_key_is_decryption_failed() {
        let u = uploaded(b"biopsy").await;
        let wrong = EncryptionKey::generate().unwrap().to_hex();

        let result = u
            .h
            .exchange
            .retrieve(
                &u.patient.sign_now(Action::Retrieve),
                retrieve_input(&u.receipt.storage_address, &wrong, u.patient.address()),
            )
            .await;
        assert!(matches!(result, Err(ExchangeError::DecryptionFailed)));
    }

    #[tokio::test]
    async fn garbled_key_is_decryption_failed() {
        let u = uploaded(b"biopsy").await;

        for key in ["abc", "zz", &u.receipt.key[..62]] {
            let result = u
                .h
                .exchange
                .retrieve(
                    &u.patient.sign_now(Action::Retrieve),
                    retrieve_input(&u.receipt.storage_address, key, u.patient.address()),
                )
                .await;
            assert!(matches!(result, Err(ExchangeError::DecryptionFailed)));
        }
    }

    #[tokio::test]
    async fn tampered_blob_is_decryption_failed() {
        let u = uploaded(b"blood panel").await;
        let mut blob = u.h.store.get(&u.receipt.storage_address).await.unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        u.h.store
            .replace(&u.receipt.storage_address, blob)
            .await
            .unwrap();

        let result = u
            .h
            .exchange
            .retrieve(
                &u.patient.sign_now(Action::Retrieve),
                retrieve_input(
                    &u.receipt.storage_address,
                    &u.receipt.key,
                    u.patient.address(),
                ),
            )
            .await;
        assert!(matches!(result, Err(ExchangeError::DecryptionFailed)));
    }

    #[tokio::test]
    async fn unknown_address_is_not_found() {
        let u = uploaded(b"x").await;
        let result = u
            .h
            .exchange
            .retrieve(
                &u.patient.sign_now(Action::Retrieve),
                retrieve_input("sha256-00", &u.receipt.key, u.patient.address()),
            )
            .await;
        assert!(matches!(result, Err(ExchangeError::RecordNotFound)));
    }

    #[tokio::test]
    async fn missing_parameters_are_rejected() {
        let u = uploaded(b"x").await;
        let base = retrieve_input(
            &u.receipt.storage_address,
            &u.receipt.key,
            u.patient.address(),
        );

        for input in [
            RetrieveInput {
                storage_address: None,
                ..base.clone()
            },
            RetrieveInput {
                key: Some(String::new()),
                ..base.clone()
            },
            RetrieveInput {
                patient_address: None,
                ..base.clone()
            },
        ] {
            let result = u
                .h
                .exchange
                .retrieve(&u.patient.sign_now(Action::Retrieve), input)
                .await;
            assert!(matches!(result, Err(ExchangeError::ParamsMissing(_))));
        }
    }

    #[tokio::test]
    async fn registry_outage_denies_delegated_access_but_not_self_access() {
        let u = uploaded(b"ecg").await;
        let doctor = TestWallet::random();
        u.h.registry.grant(u.patient.address(), doctor.address()).await;
        u.h.registry.set_available(false);

        let input = retrieve_input(
            &u.receipt.storage_address,
            &u.receipt.key,
            u.patient.address(),
        );
        let result = u
            .h
            .exchange
            .retrieve(&doctor.sign_now(Action::Retrieve), input.clone())
            .await;
        assert!(
            matches!(result, Err(ExchangeError::Forbidden(reason)) if reason.starts_with("verification failed: "))
        );

        let record = u
            .h
            .exchange
            .retrieve(&u.patient.sign_now(Action::Retrieve), input)
            .await
            .unwrap();
        assert_eq!(record.bytes, b"ecg");
    }

    #[tokio::test]
    async fn store_outage_after_authorization_is_service_unavailable() {
        let u = uploaded(b"x").await;
        u.h.store.set_available(false);

        let result = u
            .h
            .exchange
            .retrieve(
                &u.patient.sign_now(Action::Retrieve),
                retrieve_input(
                    &u.receipt.storage_address,
                    &u.receipt.key,
                    u.patient.address(),
                ),
            )
            .await;
        assert!(matches!(result, Err(ExchangeError::ServiceUnavailable(_))));
    }
}
