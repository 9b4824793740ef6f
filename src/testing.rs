// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network helpers for tests.

use std::net::SocketAddr;

use tokio::net::TcpListener;

/// Bind a local port that accepts connections and never answers.
///
/// Requests to it hang until the client gives up, which is what an
/// overloaded RPC node or IPFS daemon looks like from here.
pub async fn stalled_endpoint() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}
