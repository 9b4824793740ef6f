// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! IPFS (Kubo HTTP RPC API) content store.
//!
//! Uses three endpoints:
//!
//! | Endpoint | Purpose |
//! |----------|---------|
//! | `POST /api/v0/add?pin=true&cid-version=1` | store a blob, returns its CID |
//! | `POST /api/v0/cat?arg=<cid>` | fetch a blob |
//! | `POST /api/v0/version` | availability probe |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;
use url::Url;

use super::content::{ContentStore, StoreError};

/// Response of `/api/v0/add`.
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Kubo HTTP API client.
#[derive(Debug, Clone)]
pub struct IpfsStore {
    client: Client,
    api_base: Url,
}

impl IpfsStore {
    /// Build a client for the API at `api_url` (e.g. `http://127.0.0.1:5001`).
    ///
    /// Every request is bounded by `timeout`.
    pub fn connect(api_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let mut api_base = Url::parse(api_url)
            .map_err(|e| StoreError::InvalidConfig(format!("ipfs api url: {e}")))?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self { client, api_base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.api_base
            .join(path)
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status.is_server_error() && body.contains("not found") {
            return Err(StoreError::NotFound(body));
        }
        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            return Err(StoreError::Rejected(format!("{status}: {body}")));
        }
        Err(StoreError::Unavailable(format!("{status}: {body}")))
    }
}

fn transport_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Unavailable("request timed out".to_string())
    } else {
        StoreError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl ContentStore for IpfsStore {
    async fn is_available(&self) -> bool {
        let Ok(url) = self.endpoint("api/v0/version") else {
            return false;
        };
        match self.client.post(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "IPFS availability probe failed");
                false
            }
        }
    }

    async fn put(&self, blob: Vec<u8>) -> Result<String, StoreError> {
        let mut url = self.endpoint("api/v0/add")?;
        url.query_pairs_mut()
            .append_pair("pin", "true")
            .append_pair("cid-version", "1");

        let size = blob.len();
        let form = multipart::Form::new().part(
            "file",
            multipart::Part::bytes(blob).file_name("record.bin"),
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let added: AddResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Rejected(format!("unexpected add response: {e}")))?;

        tracing::debug!(cid = %added.hash, size, "Stored blob on IPFS");
        Ok(added.hash)
    }

    async fn get(&self, address: &str) -> Result<Vec<u8>, StoreError> {
        let mut url = self.endpoint("api/v0/cat")?;
        url.query_pairs_mut().append_pair("arg", address);

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(transport_error)?;
        let bytes = Self::check_status(response)
            .await?
            .bytes()
            .await
            .map_err(transport_error)?;
        Ok(bytes.to_vec())
    }

    fn kind(&self) -> &'static str {
        "ipfs"
    }
}
