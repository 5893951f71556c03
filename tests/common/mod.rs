//! Shared utilities for integration tests.

use std::future::Future;
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::process::Command;
use std::time::Duration;

use pyth_devnet::config::loader::ENV_KEYS;
use pyth_devnet::net::{ConnectionTracker, ListenerOptions, ReadinessListener};

/// Start a readiness listener on an ephemeral loopback port.
#[allow(dead_code)]
pub async fn start_readiness(read_timeout: Option<Duration>) -> (SocketAddr, ConnectionTracker) {
    let options = ListenerOptions {
        bind_address: "127.0.0.1:0".to_string(),
        read_timeout,
    };
    let listener = ReadinessListener::bind(&options).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let tracker = listener.tracker();

    tokio::spawn(async move {
        listener.serve().await;
    });

    (addr, tracker)
}

/// Poll `check` until it returns true or `limit` elapses.
#[allow(dead_code)]
pub async fn wait_until<F, Fut>(limit: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

/// A port that was free a moment ago.
#[allow(dead_code)]
pub fn free_port() -> u16 {
    StdTcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// The driver binary with every configuration key cleared.
#[allow(dead_code)]
pub fn driver() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pyth-devnet"));
    for key in ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd.env("RUST_LOG", "pyth_devnet=debug");
    cmd
}
