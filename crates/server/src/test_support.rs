// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Local stand-ins for remote APIs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use axum::Router;
use reqwest::Client;
use std::net::SocketAddr;
use std::time::Duration;

use crate::client_error::http_client;

/// HTTP client for talking to stubs.
pub fn test_client() -> Client {
    http_client(Duration::from_secs(5)).unwrap()
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener: tokio::net::TcpListener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}
