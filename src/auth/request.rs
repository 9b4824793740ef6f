// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed request headers and the actions they can authorize.

use std::{fmt, str::FromStr};

use alloy::primitives::Address;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AuthError;

/// Header carrying the wallet address the caller claims to be.
pub const ADDRESS_HEADER: &str = "x-wallet-address";
/// Header carrying the hex-encoded personal-message signature.
pub const SIGNATURE_HEADER: &str = "x-signature";
/// Header carrying the unix timestamp (seconds) that was signed.
pub const TIMESTAMP_HEADER: &str = "x-timestamp";
/// Header carrying the action that was signed.
pub const ACTION_HEADER: &str = "x-action";

/// Operation a signature authorizes.
///
/// The header value is parsed into this closed set before any
/// cryptographic work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Upload,
    Retrieve,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Upload => "upload",
            Action::Retrieve => "retrieve",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(Action::Upload),
            "retrieve" => Ok(Action::Retrieve),
            _ => Err(AuthError::Malformed),
        }
    }
}

/// The authentication material of one inbound request.
///
/// Lives for the duration of a single request and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Address as sent by the caller; not trusted until recovered.
    pub claimed_address: String,
    /// Hex signature over `{namespace}:{action}:{timestamp}`.
    pub signature: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub action: Action,
}

impl SignedRequest {
    /// Read the four signing headers.
    ///
    /// An absent (or empty) header is `HeadersMissing`; a present but
    /// unparseable timestamp or unknown action is `Malformed`.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AuthError> {
        let claimed_address = header_value(headers, ADDRESS_HEADER)?;
        let signature = header_value(headers, SIGNATURE_HEADER)?;
        let timestamp = header_value(headers, TIMESTAMP_HEADER)?;
        let action = header_value(headers, ACTION_HEADER)?;

        let timestamp = timestamp
            .parse::<i64>()
            .map_err(|_| AuthError::Malformed)?;
        let action = action.parse::<Action>()?;

        Ok(Self {
            claimed_address: claimed_address.to_string(),
            signature: signature.to_string(),
            timestamp,
            action,
        })
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AuthError> {
    let value = headers
        .get(name)
        .ok_or(AuthError::HeadersMissing)?
        .to_str()
        .map_err(|_| AuthError::Malformed)?
        .trim();

    if value.is_empty() {
        return Err(AuthError::HeadersMissing);
    }
    Ok(value)
}

/// A caller whose signature has been checked.
///
/// `address` always comes from signature recovery, never from the
/// claimed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub address: Address,
    pub action: Action,
}

impl VerifiedIdentity {
    /// EIP-55 checksummed form of the recovered address.
    pub fn checksummed(&self) -> String {
        self.address.to_checksum(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn parses_complete_headers() {
        let map = headers(&[
            (ADDRESS_HEADER, "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12"),
            (SIGNATURE_HEADER, "0xdead"),
            (TIMESTAMP_HEADER, "1700000000"),
            (ACTION_HEADER, "retrieve"),
        ]);

        let request = SignedRequest::from_headers(&map).unwrap();
        assert_eq!(request.timestamp, 1_700_000_000);
        assert_eq!(request.action, Action::Retrieve);
        assert_eq!(request.signature, "0xdead");
    }

    #[test]
    fn missing_or_blank_header_is_headers_missing() {
        let map = headers(&[
            (ADDRESS_HEADER, "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12"),
            (SIGNATURE_HEADER, "0xdead"),
            (TIMESTAMP_HEADER, "1700000000"),
        ]);
        assert_eq!(
            SignedRequest::from_headers(&map),
            Err(AuthError::HeadersMissing)
        );

        let map = headers(&[
            (ADDRESS_HEADER, "  "),
            (SIGNATURE_HEADER, "0xdead"),
            (TIMESTAMP_HEADER, "1700000000"),
            (ACTION_HEADER, "upload"),
        ]);
        assert_eq!(
            SignedRequest::from_headers(&map),
            Err(AuthError::HeadersMissing)
        );
    }

    #[test]
    fn unknown_action_and_bad_timestamp_are_malformed() {
        let map = headers(&[
            (ADDRESS_HEADER, "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12"),
            (SIGNATURE_HEADER, "0xdead"),
            (TIMESTAMP_HEADER, "1700000000"),
            (ACTION_HEADER, "delete"),
        ]);
        assert_eq!(SignedRequest::from_headers(&map), Err(AuthError::Malformed));

        let map = headers(&[
            (ADDRESS_HEADER, "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12"),
            (SIGNATURE_HEADER, "0xdead"),
            (TIMESTAMP_HEADER, "yesterday"),
            (ACTION_HEADER, "upload"),
        ]);
        assert_eq!(SignedRequest::from_headers(&map), Err(AuthError::Malformed));
    }

    #[test]
    fn action_round_trips_through_str() {
        for action in [Action::Upload, Action::Retrieve] {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }
}
