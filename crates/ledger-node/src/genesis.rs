//! # Genesis Registry
//!
//! Seeds the stake registry at startup from a JSON document:
//!
//! ```json
//! {
//!   "voters":    [{ "id": "alice", "stake": 50 }],
//!   "delegates": ["A", "B"],
//!   "votes":     [{ "voter": "alice", "delegate": "A" }]
//! }
//! ```
//!
//! Entries go through the same registry operations as live traffic, and an
//! initial election runs once they are applied.

use std::fs;
use std::path::{Path, PathBuf};

use dpos_ledger::{
    DelegateId, ElectionResult, GovernanceApi, LedgerError, LedgerService, SchedulingApi, VoterId,
};
use ledger_telemetry::ELECTIONS;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Genesis loading errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// The file could not be read.
    #[error("Failed to read genesis file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid registry.
    #[error("Invalid genesis registry: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry was rejected by the ledger.
    #[error("Genesis entry rejected: {0}")]
    Ledger(#[from] LedgerError),
}

/// A voter and their initial stake.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenesisVoter {
    pub id: VoterId,
    pub stake: u64,
}

/// An initial vote.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenesisVote {
    pub voter: VoterId,
    pub delegate: DelegateId,
}

/// Initial voters, delegates, and votes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisRegistry {
    #[serde(default)]
    pub voters: Vec<GenesisVoter>,
    #[serde(default)]
    pub delegates: Vec<DelegateId>,
    #[serde(default)]
    pub votes: Vec<GenesisVote>,
}

impl GenesisRegistry {
    pub fn from_json(json: &str) -> Result<Self, GenesisError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, GenesisError> {
        let json = fs::read_to_string(path).map_err(|source| GenesisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Register everything, cast the votes, then elect the first committee.
    ///
    /// Stops at the first rejected entry.
    pub fn apply(&self, ledger: &LedgerService) -> Result<ElectionResult, GenesisError> {
        for voter in &self.voters {
            ledger.register_voter(voter.id.clone(), voter.stake)?;
        }
        for delegate in &self.delegates {
            ledger.register_delegate(delegate.clone())?;
        }
        for vote in &self.votes {
            ledger.cast_vote(&vote.voter, &vote.delegate)?;
        }

        let committee = ledger.run_election();
        ELECTIONS.with_label_values(&["genesis"]).inc();
        info!(
            voters = self.voters.len(),
            delegates = self.delegates.len(),
            votes = self.votes.len(),
            committee = ?committee.order(),
            "Genesis registry applied"
        );
        Ok(committee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpos_ledger::{LedgerConfig, VotingError};
    use std::io::Write;

    const REGISTRY: &str = r#"{
        "voters": [
            {"id": "v1", "stake": 50},
            {"id": "v2", "stake": 30},
            {"id": "v3", "stake": 10}
        ],
        "delegates": ["A", "B", "C"],
        "votes": [
            {"voter": "v1", "delegate": "A"},
            {"voter": "v2", "delegate": "B"},
            {"voter": "v3", "delegate": "C"}
        ]
    }"#;

    #[test]
    fn test_apply_elects_committee() {
        let ledger = LedgerService::new(LedgerConfig {
            committee_size: 2,
            ..Default::default()
        })
        .unwrap();
        let genesis_elections = ELECTIONS.with_label_values(&["genesis"]);
        let before = genesis_elections.get();

        let committee = GenesisRegistry::from_json(REGISTRY)
            .unwrap()
            .apply(&ledger)
            .unwrap();
        assert!(genesis_elections.get() > before);

        assert_eq!(
            committee.order(),
            vec![DelegateId::new("A"), DelegateId::new("B")]
        );
        assert_eq!(ledger.votes_of(&DelegateId::new("C")).unwrap(), 10);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(REGISTRY.as_bytes()).unwrap();

        let registry = GenesisRegistry::load(file.path()).unwrap();
        assert_eq!(registry.voters.len(), 3);
        assert_eq!(registry.delegates.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = GenesisRegistry::load(Path::new("/nonexistent/genesis.json")).unwrap_err();
        assert!(matches!(err, GenesisError::Io { .. }));
    }

    #[test]
    fn test_unknown_delegate_in_votes() {
        let ledger = LedgerService::new(LedgerConfig::default()).unwrap();
        let registry = GenesisRegistry::from_json(
            r#"{"voters": [{"id": "v1", "stake": 5}], "votes": [{"voter": "v1", "delegate": "Z"}]}"#,
        )
        .unwrap();

        let err = registry.apply(&ledger).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::Ledger(LedgerError::Voting(VotingError::UnknownDelegate(_)))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            GenesisRegistry::from_json(r#"{"validators": []}"#),
            Err(GenesisError::Parse(_))
        ));
    }
}
