//! Configuration types for the ledger service

use crate::domain::ConfigError;
use serde::Deserialize;
use std::str::FromStr;

/// Default number of committee seats
pub const DEFAULT_COMMITTEE_SIZE: usize = 3;

/// Whether appends must come from the scheduled proposer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposerPolicy {
    /// Any submitter may append; rotation only tracks whose turn it is
    #[default]
    Open,
    /// Only the current proposer may append
    Enforced,
}

impl FromStr for ProposerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(ProposerPolicy::Open),
            "enforced" => Ok(ProposerPolicy::Enforced),
            other => Err(format!("unknown proposer policy: {other}")),
        }
    }
}

/// Runtime configuration for the ledger
#[derive(Clone, Debug, Deserialize)]
pub struct LedgerConfig {
    /// Seats in the elected committee
    pub committee_size: usize,

    /// Proposer authorization on append
    pub proposer_policy: ProposerPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            committee_size: DEFAULT_COMMITTEE_SIZE,
            proposer_policy: ProposerPolicy::Open,
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.committee_size == 0 {
            return Err(ConfigError::ZeroCommitteeSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.committee_size, 3);
        assert_eq!(config.proposer_policy, ProposerPolicy::Open);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_committee_rejected() {
        let config = LedgerConfig {
            committee_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCommitteeSize));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Enforced".parse::<ProposerPolicy>(), Ok(ProposerPolicy::Enforced));
        assert_eq!("open".parse::<ProposerPolicy>(), Ok(ProposerPolicy::Open));
        assert!("strict".parse::<ProposerPolicy>().is_err());
    }
}
