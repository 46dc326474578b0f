//! # Node Configuration
//!
//! Runtime parameters for the node, read from `LEDGER_*` environment
//! variables with defaults for everything.

use std::env;
use std::path::PathBuf;

use dpos_ledger::{LedgerConfig, ProposerPolicy, DEFAULT_COMMITTEE_SIZE};
use thiserror::Error;

use crate::scheduler::ElectionSchedule;

/// Default HTTP listening port.
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Default election cadence in blocks.
pub const DEFAULT_ELECTION_INTERVAL: u64 = 10;

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// HTTP listening port.
    pub http_port: u16,
    /// Committee size and proposer policy for the core.
    pub ledger: LedgerConfig,
    /// When elections run.
    pub election: ElectionSchedule,
    /// Optional JSON file seeding voters, delegates, and votes.
    pub genesis_file: Option<PathBuf>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            ledger: LedgerConfig::default(),
            election: ElectionSchedule::EveryNBlocks(DEFAULT_ELECTION_INTERVAL),
            genesis_file: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// The ledger rejected the resulting configuration.
    #[error(transparent)]
    Ledger(#[from] dpos_ledger::ConfigError),
}

impl NodeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LEDGER_HTTP_PORT`: HTTP port (default: 3000)
    /// - `LEDGER_COMMITTEE_SIZE`: Committee seats (default: 3)
    /// - `LEDGER_PROPOSER_POLICY`: `open` or `enforced` (default: open)
    /// - `LEDGER_ELECTION_INTERVAL`: Blocks between elections, 0 for on demand only (default: 10)
    /// - `LEDGER_GENESIS_FILE`: Path to a genesis registry JSON file
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(port) = parse_var(&lookup, "LEDGER_HTTP_PORT")? {
            config.http_port = port;
        }
        config.ledger.committee_size =
            parse_var(&lookup, "LEDGER_COMMITTEE_SIZE")?.unwrap_or(DEFAULT_COMMITTEE_SIZE);

        if let Some(policy) = lookup("LEDGER_PROPOSER_POLICY") {
            config.ledger.proposer_policy =
                policy
                    .parse::<ProposerPolicy>()
                    .map_err(|reason| ConfigError::InvalidValue {
                        key: "LEDGER_PROPOSER_POLICY",
                        value: policy.clone(),
                        reason,
                    })?;
        }

        if let Some(interval) = parse_var::<u64>(&lookup, "LEDGER_ELECTION_INTERVAL")? {
            config.election = ElectionSchedule::from_interval(interval);
        }
        config.genesis_file = lookup("LEDGER_GENESIS_FILE")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the ledger cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ledger.validate()?;
        Ok(())
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<NodeConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.ledger.committee_size, 3);
        assert_eq!(config.ledger.proposer_policy, ProposerPolicy::Open);
        assert_eq!(config.election, ElectionSchedule::EveryNBlocks(10));
        assert!(config.genesis_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("LEDGER_HTTP_PORT", "8080"),
            ("LEDGER_COMMITTEE_SIZE", "5"),
            ("LEDGER_PROPOSER_POLICY", "enforced"),
            ("LEDGER_ELECTION_INTERVAL", "0"),
            ("LEDGER_GENESIS_FILE", "/etc/ledger/genesis.json"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.ledger.committee_size, 5);
        assert_eq!(config.ledger.proposer_policy, ProposerPolicy::Enforced);
        assert_eq!(config.election, ElectionSchedule::OnDemand);
        assert_eq!(
            config.genesis_file,
            Some(PathBuf::from("/etc/ledger/genesis.json"))
        );
    }

    #[test]
    fn test_bad_port() {
        let err = load(&[("LEDGER_HTTP_PORT", "eighty")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "LEDGER_HTTP_PORT",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_policy() {
        assert!(load(&[("LEDGER_PROPOSER_POLICY", "strict")]).is_err());
    }

    #[test]
    fn test_zero_committee() {
        let err = load(&[("LEDGER_COMMITTEE_SIZE", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Ledger(_)));
    }
}
