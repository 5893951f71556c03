//! Configuration loading from the process environment.

use std::ffi::OsString;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::{
    keypair_in, rpc_url_for, DevnetConfig, DEFAULT_AIRDROP_AMOUNT, DEFAULT_KEY_STORE,
    DEFAULT_PROGRAM_SO_PATH, DEFAULT_PUBLISHER_INTERVAL_SECS, DEFAULT_PYTH_PATH,
    DEFAULT_READINESS_PORT, DEFAULT_RPC_HOST, DEFAULT_RPC_PORT,
};

pub const PYTH: &str = "PYTH";
pub const PYTH_KEY_STORE: &str = "PYTH_KEY_STORE";
pub const PYTH_PROGRAM_KEYPAIR: &str = "PYTH_PROGRAM_KEYPAIR";
pub const PYTH_PROGRAM_SO: &str = "PYTH_PROGRAM_SO";
pub const PYTH_PUBLISHER_KEYPAIR: &str = "PYTH_PUBLISHER_KEYPAIR";
pub const PYTH_PUBLISHER_INTERVAL: &str = "PYTH_PUBLISHER_INTERVAL";
pub const SOL_AIRDROP_AMT: &str = "SOL_AIRDROP_AMT";
pub const SOL_RPC_HOST: &str = "SOL_RPC_HOST";
pub const SOL_RPC_PORT: &str = "SOL_RPC_PORT";
pub const SOL_RPC_URL: &str = "SOL_RPC_URL";
pub const READINESS_PORT: &str = "READINESS_PORT";

/// Every environment key the loader consults.
pub const ENV_KEYS: [&str; 11] = [
    PYTH,
    PYTH_KEY_STORE,
    PYTH_PROGRAM_KEYPAIR,
    PYTH_PROGRAM_SO,
    PYTH_PUBLISHER_KEYPAIR,
    PYTH_PUBLISHER_INTERVAL,
    SOL_AIRDROP_AMT,
    SOL_RPC_HOST,
    SOL_RPC_PORT,
    SOL_RPC_URL,
    READINESS_PORT,
];

/// Error type for configuration loading.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A numeric key holds something that does not parse.
    #[error("{key}={value:?} is not a valid number: {reason}")]
    InvalidNumber {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl DevnetConfig {
    /// Resolve the configuration from the process environment.
    ///
    /// Variables that are not valid unicode are decoded lossily, so a
    /// mangled numeric override still fails to parse instead of defaulting.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key).map(lossy))
    }

    /// Resolve the configuration from an arbitrary key lookup.
    ///
    /// A present key is used verbatim, even when empty. Only absent keys
    /// fall back to their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let key_store = string(PYTH_KEY_STORE, DEFAULT_KEY_STORE);
        let default_keypair = keypair_in(&key_store);

        let publisher_interval_secs: f64 =
            parse_or(&lookup, PYTH_PUBLISHER_INTERVAL, DEFAULT_PUBLISHER_INTERVAL_SECS)?;

        let rpc_host = string(SOL_RPC_HOST, DEFAULT_RPC_HOST);
        let rpc_port = parse_or(&lookup, SOL_RPC_PORT, DEFAULT_RPC_PORT)?;
        let rpc_url = lookup(SOL_RPC_URL).unwrap_or_else(|| rpc_url_for(&rpc_host, rpc_port));

        Ok(Self {
            pyth_path: string(PYTH, DEFAULT_PYTH_PATH),
            program_keypair: string(PYTH_PROGRAM_KEYPAIR, &default_keypair),
            program_so_path: string(PYTH_PROGRAM_SO, DEFAULT_PROGRAM_SO_PATH),
            publisher_keypair: string(PYTH_PUBLISHER_KEYPAIR, &default_keypair),
            publisher_interval_secs,
            airdrop_amount: parse_or(&lookup, SOL_AIRDROP_AMT, DEFAULT_AIRDROP_AMOUNT)?,
            rpc_host,
            rpc_port,
            rpc_url,
            readiness_port: parse_or(&lookup, READINESS_PORT, DEFAULT_READINESS_PORT)?,
            key_store,
        })
    }
}

fn lossy(value: OsString) -> String {
    value
        .into_string()
        .unwrap_or_else(|raw| raw.to_string_lossy().into_owned())
}

/// Parse a numeric key, or return `default` when the key is absent.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidNumber {
            key,
            reason: e.to_string(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<DevnetConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DevnetConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_empty_environment_yields_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, DevnetConfig::default());

        assert_eq!(config.pyth_path, "./pyth");
        assert_eq!(config.key_store, "/home/pyth/.pythd");
        assert_eq!(config.program_keypair, "/home/pyth/.pythd/publish_key_pair.json");
        assert_eq!(config.program_so_path, "../target/oracle.so");
        assert_eq!(config.publisher_keypair, "/home/pyth/.pythd/publish_key_pair.json");
        assert_eq!(config.publisher_interval_secs, 5.0);
        assert_eq!(config.airdrop_amount, 0);
        assert_eq!(config.rpc_host, "solana-devnet");
        assert_eq!(config.rpc_port, 8899);
        assert_eq!(config.rpc_url, "solana-devnet:8899");
        assert_eq!(config.readiness_port, 2000);
    }

    #[test]
    fn test_every_key_overrides() {
        let config = load(&[
            (PYTH, "/usr/bin/pyth"),
            (PYTH_KEY_STORE, "/keys"),
            (PYTH_PROGRAM_KEYPAIR, "/keys/program.json"),
            (PYTH_PROGRAM_SO, "/build/oracle.so"),
            (PYTH_PUBLISHER_KEYPAIR, "/keys/publisher.json"),
            (PYTH_PUBLISHER_INTERVAL, "0.5"),
            (SOL_AIRDROP_AMT, "100"),
            (SOL_RPC_HOST, "localhost"),
            (SOL_RPC_PORT, "9000"),
            (SOL_RPC_URL, "http://rpc.internal:1234"),
            (READINESS_PORT, "2100"),
        ])
        .unwrap();

        assert_eq!(config.pyth_path, "/usr/bin/pyth");
        assert_eq!(config.key_store, "/keys");
        assert_eq!(config.program_keypair, "/keys/program.json");
        assert_eq!(config.program_so_path, "/build/oracle.so");
        assert_eq!(config.publisher_keypair, "/keys/publisher.json");
        assert_eq!(config.publisher_interval_secs, 0.5);
        assert_eq!(config.airdrop_amount, 100);
        assert_eq!(config.rpc_host, "localhost");
        assert_eq!(config.rpc_port, 9000);
        assert_eq!(config.rpc_url, "http://rpc.internal:1234");
        assert_eq!(config.readiness_port, 2100);
    }

    #[test]
    fn test_keypairs_follow_key_store() {
        let config = load(&[(PYTH_KEY_STORE, "/tmp/store")]).unwrap();
        assert_eq!(config.program_keypair, "/tmp/store/publish_key_pair.json");
        assert_eq!(config.publisher_keypair, "/tmp/store/publish_key_pair.json");
    }

    #[test]
    fn test_rpc_url_follows_host_and_port() {
        let config = load(&[(SOL_RPC_HOST, "validator"), (SOL_RPC_PORT, "18899")]).unwrap();
        assert_eq!(config.rpc_url, "validator:18899");
    }

    #[test]
    fn test_numbers_are_trimmed() {
        let config = load(&[(READINESS_PORT, " 2001\n"), (PYTH_PUBLISHER_INTERVAL, "2")]).unwrap();
        assert_eq!(config.readiness_port, 2001);
        assert_eq!(config.publisher_interval_secs, 2.0);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        for key in [SOL_RPC_PORT, READINESS_PORT, SOL_AIRDROP_AMT, PYTH_PUBLISHER_INTERVAL] {
            let err = load(&[(key, "not-a-number")]).unwrap_err();
            match err {
                ConfigError::InvalidNumber { key: k, value, .. } => {
                    assert_eq!(k, key);
                    assert_eq!(value, "not-a-number");
                }
                other => panic!("unexpected error for {}: {:?}", key, other),
            }
        }
    }

    #[test]
    fn test_empty_numeric_value_is_rejected() {
        let err = load(&[(SOL_RPC_PORT, "")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: SOL_RPC_PORT, .. }));
    }

    #[test]
    fn test_out_of_range_port_is_rejected() {
        let err = load(&[(READINESS_PORT, "70000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: READINESS_PORT, .. }));
    }

    #[test]
    fn test_negative_interval_is_kept() {
        let config = load(&[(PYTH_PUBLISHER_INTERVAL, "-1")]).unwrap();
        assert_eq!(config.publisher_interval_secs, -1.0);
    }

    #[test]
    fn test_non_finite_intervals_are_kept() {
        let config = load(&[(PYTH_PUBLISHER_INTERVAL, "inf")]).unwrap();
        assert!(config.publisher_interval_secs.is_infinite());

        let config = load(&[(PYTH_PUBLISHER_INTERVAL, "nan")]).unwrap();
        assert!(config.publisher_interval_secs.is_nan());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_value_is_decoded_lossily() {
        use std::os::unix::ffi::OsStringExt;

        let decoded = lossy(OsString::from_vec(b"20\xff0".to_vec()));
        assert_eq!(decoded, "20\u{FFFD}0");

        let err = load(&[(READINESS_PORT, decoded.as_str())]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: READINESS_PORT, .. }));
    }

    #[test]
    fn test_empty_string_is_kept_verbatim() {
        let config = load(&[(PYTH, "")]).unwrap();
        assert_eq!(config.pyth_path, "");
    }

    #[test]
    fn test_unrelated_keys_are_ignored() {
        let config = load(&[("PYTH_SOMETHING_ELSE", "x"), ("RPC_HOST", "y")]).unwrap();
        assert_eq!(config, DevnetConfig::default());
    }

    #[test]
    fn test_error_display_names_key() {
        let err = load(&[(SOL_RPC_PORT, "abc")]).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("SOL_RPC_PORT"));
        assert!(text.contains("abc"));
    }
}
