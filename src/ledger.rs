//! External score ledger
//!
//! New high scores are offered to a `ScoreSink`. The game does not sign or
//! send anything itself: `LedgerSink` appends a `submitScore(uint256)` request
//! per line to an outbox file that an out-of-process signer drains.
//!
//! Submission is fire-and-forget. Failures are logged and otherwise ignored.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contract method every request targets
pub const SUBMIT_METHOD: &str = "submitScore(uint256)";
/// Gas limit attached to each request
pub const SUBMIT_GAS: u64 = 200_000;
/// 1 gwei
pub const SUBMIT_GAS_PRICE_WEI: u64 = 1_000_000_000;

/// Destination for new high scores
pub trait ScoreSink {
    fn submit(&mut self, score: u32);
}

/// Sink used when no ledger is configured
#[derive(Debug, Default)]
pub struct NullSink;

impl ScoreSink for NullSink {
    fn submit(&mut self, score: u32) {
        log::debug!("Ledger disabled, not submitting score {}", score);
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{name} is not a 0x-prefixed 20-byte hex address: {value:?}")]
    InvalidAddress { name: &'static str, value: String },
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("outbox {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serializing request: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where requests go and who signs them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub rpc_url: Option<String>,
    pub contract_address: String,
    pub signer_address: String,
}

impl LedgerConfig {
    /// Read `RPC_URL`, `CONTRACT_ADDRESS` and `SIGNER_ADDRESS` from the process environment
    pub fn from_env() -> Result<Self, LedgerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LedgerError> {
        let read = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let contract = read("CONTRACT_ADDRESS").ok_or(LedgerError::Missing("CONTRACT_ADDRESS"))?;
        let signer = read("SIGNER_ADDRESS").ok_or(LedgerError::Missing("SIGNER_ADDRESS"))?;
        Ok(Self {
            rpc_url: read("RPC_URL"),
            contract_address: normalize_address("CONTRACT_ADDRESS", &contract)?,
            signer_address: normalize_address("SIGNER_ADDRESS", &signer)?,
        })
    }
}

/// Lowercase a `0x` + 40 hex digit address, rejecting anything else
pub fn normalize_address(name: &'static str, value: &str) -> Result<String, LedgerError> {
    let invalid = || LedgerError::InvalidAddress {
        name,
        value: value.to_string(),
    };
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(invalid)?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    Ok(format!("0x{}", hex.to_ascii_lowercase()))
}

/// One line of the outbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub method: String,
    pub score: u32,
    pub contract: String,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    pub gas: u64,
    pub gas_price_wei: u64,
    pub requested_at: u64,
}

/// Appends submission requests to a JSON-lines outbox
#[derive(Debug)]
pub struct LedgerSink {
    config: LedgerConfig,
    outbox: PathBuf,
}

impl LedgerSink {
    pub fn new(config: LedgerConfig, outbox: impl Into<PathBuf>) -> Self {
        Self {
            config,
            outbox: outbox.into(),
        }
    }

    pub fn outbox(&self) -> &Path {
        &self.outbox
    }

    fn request(&self, score: u32) -> SubmitRequest {
        let requested_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        SubmitRequest {
            method: SUBMIT_METHOD.to_string(),
            score,
            contract: self.config.contract_address.clone(),
            from: self.config.signer_address.clone(),
            rpc_url: self.config.rpc_url.clone(),
            gas: SUBMIT_GAS,
            gas_price_wei: SUBMIT_GAS_PRICE_WEI,
            requested_at,
        }
    }

    /// Append one request line
    pub fn try_submit(&self, score: u32) -> Result<(), LedgerError> {
        let mut line = serde_json::to_string(&self.request(score))?;
        line.push('\n');
        let io_err = |source| LedgerError::Io {
            path: self.outbox.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.outbox)
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).map_err(io_err)
    }
}

impl ScoreSink for LedgerSink {
    fn submit(&mut self, score: u32) {
        match self.try_submit(score) {
            Ok(()) => log::info!(
                "Queued score {} for {} in {}",
                score,
                self.config.contract_address,
                self.outbox.display()
            ),
            Err(e) => log::warn!("Score submission failed: {}", e),
        }
    }
}

/// Pick the sink for this run.
///
/// Without an outbox, or with missing/invalid addresses, submission is
/// disabled with a warning and the game carries on.
pub fn sink_from_config(
    outbox: Option<PathBuf>,
    config: Result<LedgerConfig, LedgerError>,
) -> Box<dyn ScoreSink> {
    let Some(outbox) = outbox else {
        log::info!("No ledger outbox set, skipping score submission");
        return Box::new(NullSink);
    };
    match config {
        Ok(config) => {
            log::info!("Submitting high scores to {}", config.contract_address);
            Box::new(LedgerSink::new(config, outbox))
        }
        Err(LedgerError::Missing(name)) => {
            log::warn!("No {} set, skipping score submission", name);
            Box::new(NullSink)
        }
        Err(e) => {
            log::warn!("Invalid ledger config: {}", e);
            Box::new(NullSink)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CONTRACT: &str = "0xAbCdEf0123456789abcdef0123456789ABCDEF01";
    const SIGNER: &str = "0x1111111111111111111111111111111111111111";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = LedgerConfig::from_lookup(lookup(&[
            ("RPC_URL", "http://localhost:8545"),
            ("CONTRACT_ADDRESS", CONTRACT),
            ("SIGNER_ADDRESS", SIGNER),
        ]))
        .unwrap();
        assert_eq!(config.contract_address, CONTRACT.to_ascii_lowercase());
        assert_eq!(config.rpc_url.as_deref(), Some("http://localhost:8545"));
    }

    #[test]
    fn test_missing_contract() {
        let err = LedgerConfig::from_lookup(lookup(&[("SIGNER_ADDRESS", SIGNER)])).unwrap_err();
        assert!(matches!(err, LedgerError::Missing("CONTRACT_ADDRESS")));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(normalize_address("X", "1111111111111111111111111111111111111111").is_err());
        assert!(normalize_address("X", "0x1234").is_err());
        assert!(normalize_address("X", "0xzz11111111111111111111111111111111111111").is_err());
        assert!(normalize_address("X", SIGNER).is_ok());
    }

    #[test]
    fn test_ledger_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = dir.path().join("outbox.jsonl");
        let config = LedgerConfig {
            rpc_url: None,
            contract_address: CONTRACT.to_ascii_lowercase(),
            signer_address: SIGNER.to_string(),
        };
        let mut sink = LedgerSink::new(config, &outbox);
        sink.submit(150);
        sink.submit(175);

        let text = std::fs::read_to_string(&outbox).unwrap();
        let requests: Vec<SubmitRequest> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].score, 150);
        assert_eq!(requests[1].score, 175);
        assert_eq!(requests[0].method, SUBMIT_METHOD);
        assert_eq!(requests[0].gas, SUBMIT_GAS);
        assert!(!text.contains("rpc_url"));
    }

    #[test]
    fn test_directory_outbox_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig {
            rpc_url: None,
            contract_address: CONTRACT.to_ascii_lowercase(),
            signer_address: SIGNER.to_string(),
        };
        // A directory cannot be opened for appending
        let sink = LedgerSink::new(config, dir.path());
        assert!(matches!(sink.try_submit(10), Err(LedgerError::Io { .. })));
    }
}
