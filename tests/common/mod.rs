#![allow(dead_code)]

use seedscan_gateway::config::Limits;
use seedscan_gateway::server;
use seedscan_gateway::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Limits with admission loose enough that it never interferes.
pub fn open_limits() -> Limits {
    Limits {
        rate_limit: 10_000,
        ..Limits::default()
    }
}

/// Starts a real server on an ephemeral loopback port.
pub async fn spawn_server(limits: Limits) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState::new(limits));
    tokio::spawn(server::serve(listener, state));
    addr
}
