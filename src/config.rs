// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LEDGER_RPC_URL` | JSON-RPC endpoint of the registry chain | In-memory registry |
//! | `REGISTRY_CONTRACT_ADDRESS` | Permission registry contract | In-memory registry |
//! | `IPFS_API_URL` | Kubo HTTP RPC API base URL | In-memory store |
//! | `UPSTREAM_TIMEOUT_SECS` | Bound on every registry/store call | `10` |
//! | `MAX_UPLOAD_BYTES` | Request body limit for uploads | `26214400` (25 MiB) |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; enables HTTPS when both set | Plain HTTP |
//! | `DEV_VERIFIED_ISSUERS` | Comma-separated issuers for the in-memory registry | Empty |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use alloy::primitives::Address;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LEDGER_RPC_URL_ENV: &str = "LEDGER_RPC_URL";
pub const REGISTRY_CONTRACT_ENV: &str = "REGISTRY_CONTRACT_ADDRESS";
pub const IPFS_API_URL_ENV: &str = "IPFS_API_URL";
pub const UPSTREAM_TIMEOUT_ENV: &str = "UPSTREAM_TIMEOUT_SECS";
pub const MAX_UPLOAD_BYTES_ENV: &str = "MAX_UPLOAD_BYTES";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const DEV_VERIFIED_ISSUERS_ENV: &str = "DEV_VERIFIED_ISSUERS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value `{value}`: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} and {1} must be set together")]
    Incomplete(&'static str, &'static str),
}

/// Permission registry location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub rpc_url: String,
    pub contract_address: String,
}

/// TLS certificate and key files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// `None` runs against the in-memory registry.
    pub ledger: Option<LedgerConfig>,
    /// `None` runs against the in-memory store.
    pub ipfs_api_url: Option<String>,
    pub upstream_timeout: Duration,
    pub max_upload_bytes: usize,
    pub tls: Option<TlsConfig>,
    /// Seeds the in-memory registry; ignored when a ledger is configured.
    pub dev_verified_issuers: Vec<Address>,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port: u16 = parse_or(var(PORT_ENV), PORT_ENV, DEFAULT_PORT)?;
        let bind_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: HOST_ENV,
                value: host.clone(),
                reason: e.to_string(),
            })?;

        let ledger = match (var(LEDGER_RPC_URL_ENV), var(REGISTRY_CONTRACT_ENV)) {
            (Some(rpc_url), Some(contract_address)) => Some(LedgerConfig {
                rpc_url,
                contract_address,
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::Incomplete(
                    LEDGER_RPC_URL_ENV,
                    REGISTRY_CONTRACT_ENV,
                ))
            }
        };

        let tls = match (var(TLS_CERT_PATH_ENV), var(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::Incomplete(TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV)),
        };

        let timeout_secs: u64 = parse_or(
            var(UPSTREAM_TIMEOUT_ENV),
            UPSTREAM_TIMEOUT_ENV,
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?;
        let max_upload_bytes: usize = parse_or(
            var(MAX_UPLOAD_BYTES_ENV),
            MAX_UPLOAD_BYTES_ENV,
            DEFAULT_MAX_UPLOAD_BYTES,
        )?;

        let dev_verified_issuers = match var(DEV_VERIFIED_ISSUERS_ENV) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    Address::from_str(s).map_err(|e| ConfigError::Invalid {
                        name: DEV_VERIFIED_ISSUERS_ENV,
                        value: s.to_string(),
                        reason: e.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            bind_addr,
            ledger,
            ipfs_api_url: var(IPFS_API_URL_ENV),
            upstream_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes,
            tls,
            dev_verified_issuers,
        })
    }
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
