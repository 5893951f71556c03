//! Configuration schema definitions.
//!
//! Every field maps to exactly one environment key. Serde derives exist so
//! the resolved configuration can be dumped for inspection.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Oracle CLI binary.
pub const DEFAULT_PYTH_PATH: &str = "./pyth";
/// Directory holding the oracle key material.
pub const DEFAULT_KEY_STORE: &str = "/home/pyth/.pythd";
/// Compiled on-chain oracle program.
pub const DEFAULT_PROGRAM_SO_PATH: &str = "../target/oracle.so";
/// Keypair file name inside the key store, shared by deploy and publish.
pub const PUBLISH_KEYPAIR_FILE: &str = "publish_key_pair.json";
pub const DEFAULT_PUBLISHER_INTERVAL_SECS: f64 = 5.0;
pub const DEFAULT_AIRDROP_AMOUNT: u64 = 0;
pub const DEFAULT_RPC_HOST: &str = "solana-devnet";
pub const DEFAULT_RPC_PORT: u16 = 8899;
pub const DEFAULT_READINESS_PORT: u16 = 2000;

/// Resolved settings for a local oracle devnet.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DevnetConfig {
    /// Path to the oracle CLI binary (`PYTH`).
    pub pyth_path: String,

    /// Key store directory passed to every oracle CLI call (`PYTH_KEY_STORE`).
    pub key_store: String,

    /// Keypair used to deploy the oracle program (`PYTH_PROGRAM_KEYPAIR`).
    pub program_keypair: String,

    /// Compiled program artifact (`PYTH_PROGRAM_SO`).
    pub program_so_path: String,

    /// Keypair used to publish price updates (`PYTH_PUBLISHER_KEYPAIR`).
    pub publisher_keypair: String,

    /// Publishing cadence in seconds (`PYTH_PUBLISHER_INTERVAL`).
    pub publisher_interval_secs: f64,

    /// Lamports to airdrop before setup; 0 disables it (`SOL_AIRDROP_AMT`).
    pub airdrop_amount: u64,

    /// Node RPC hostname (`SOL_RPC_HOST`).
    pub rpc_host: String,

    /// Node RPC port (`SOL_RPC_PORT`).
    pub rpc_port: u16,

    /// Node RPC endpoint handed to the node CLI (`SOL_RPC_URL`).
    pub rpc_url: String,

    /// TCP port opened once the service is ready (`READINESS_PORT`).
    pub readiness_port: u16,
}

impl DevnetConfig {
    /// Publishing cadence as a `Duration`.
    ///
    /// Negative and non-finite intervals fall back to zero.
    pub fn publisher_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.publisher_interval_secs).unwrap_or(Duration::ZERO)
    }

    /// Whether a funding airdrop should happen.
    pub fn airdrop_enabled(&self) -> bool {
        self.airdrop_amount != 0
    }

    /// Address the readiness listener binds to.
    pub fn readiness_address(&self) -> String {
        format!("0.0.0.0:{}", self.readiness_port)
    }
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self {
            pyth_path: DEFAULT_PYTH_PATH.to_string(),
            key_store: DEFAULT_KEY_STORE.to_string(),
            program_keypair: keypair_in(DEFAULT_KEY_STORE),
            program_so_path: DEFAULT_PROGRAM_SO_PATH.to_string(),
            publisher_keypair: keypair_in(DEFAULT_KEY_STORE),
            publisher_interval_secs: DEFAULT_PUBLISHER_INTERVAL_SECS,
            airdrop_amount: DEFAULT_AIRDROP_AMOUNT,
            rpc_host: DEFAULT_RPC_HOST.to_string(),
            rpc_port: DEFAULT_RPC_PORT,
            rpc_url: rpc_url_for(DEFAULT_RPC_HOST, DEFAULT_RPC_PORT),
            readiness_port: DEFAULT_READINESS_PORT,
        }
    }
}

/// Default keypair location inside a key store.
pub(crate) fn keypair_in(key_store: &str) -> String {
    format!("{}/{}", key_store, PUBLISH_KEYPAIR_FILE)
}

/// Default RPC endpoint for a host and port.
pub(crate) fn rpc_url_for(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}
