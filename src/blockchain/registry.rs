// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! On-chain permission registry client.

use std::{fmt::Display, future::Future, str::FromStr, time::Duration};

use alloy::{
    network::Ethereum,
    primitives::Address,
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    sol,
};
use async_trait::async_trait;

use super::oracle::{OracleError, PermissionOracle};

// Read-only view of the record registry contract.
sol! {
    #[sol(rpc)]
    interface IRecordRegistry {
        function isVerifiedIssuer(address account) external view returns (bool);
        function hasPermission(address patient, address requester) external view returns (bool);
    }
}

/// HTTP provider type for the registry chain (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// JSON-RPC client for the record registry contract.
pub struct RegistryClient {
    provider: HttpProvider,
    contract: IRecordRegistry::IRecordRegistryInstance<HttpProvider>,
    address: Address,
    timeout: Duration,
}

impl RegistryClient {
    /// Build a client for the contract at `contract_address`.
    ///
    /// No RPC request is made here; use [`RegistryClient::is_available`] to
    /// probe the endpoint.
    pub fn connect(
        rpc_url: &str,
        contract_address: &str,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| OracleError::InvalidConfig(format!("rpc url: {e}")))?;
        let address = Address::from_str(contract_address)
            .map_err(|e| OracleError::InvalidConfig(format!("contract address: {e}")))?;

        let provider = ProviderBuilder::new().connect_http(url);
        let contract = IRecordRegistry::new(address, provider.clone());

        Ok(Self {
            provider,
            contract,
            address,
            timeout,
        })
    }

    /// Registry contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Whether the RPC endpoint answers within the timeout.
    pub async fn is_available(&self) -> bool {
        let provider = &self.provider;
        self.bounded("eth_blockNumber", async move { provider.get_block_number().await })
            .await
            .is_ok()
    }

    async fn bounded<T, E, F>(&self, call: &'static str, fut: F) -> Result<T, OracleError>
    where
        E: Display,
        F: Future<Output = Result<T, E>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(call, error = %e, "Registry call failed");
                Err(OracleError::Unavailable(format!("{call}: {e}")))
            }
            Err(_) => {
                tracing::warn!(call, timeout = ?self.timeout, "Registry call timed out");
                Err(OracleError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl PermissionOracle for RegistryClient {
    async fn is_verified_issuer(&self, address: Address) -> Result<bool, OracleError> {
        let call = self.contract.isVerifiedIssuer(address);
        self.bounded("isVerifiedIssuer", async move { call.call().await })
            .await
    }

    async fn has_permission(
        &self,
        patient: Address,
        requester: Address,
    ) -> Result<bool, OracleError> {
        let call = self.contract.hasPermission(patient, requester);
        self.bounded("hasPermission", async move { call.call().await })
            .await
    }
}
