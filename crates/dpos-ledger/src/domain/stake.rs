//! Voter stake and delegate vote accounting
//!
//! All containers are ordered by identity so that every traversal, and
//! therefore every election, is reproducible.

use super::VotingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Voter identity
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

/// Delegate identity
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DelegateId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(VoterId);
string_id!(DelegateId);

/// A registered voter and the weight they contribute
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub id: VoterId,
    pub stake: u64,
}

/// A candidate for the proposer committee
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegate {
    pub id: DelegateId,
    /// Sum of the weights of every ballot currently backing this delegate
    pub accumulated_votes: u128,
    /// Whether the last election placed this delegate in the committee
    pub is_active: bool,
}

impl Delegate {
    pub fn new(id: DelegateId) -> Self {
        Self {
            id,
            accumulated_votes: 0,
            is_active: false,
        }
    }
}

/// A voter's current vote: who they back and the weight contributed when cast
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub delegate: DelegateId,
    pub weight: u64,
}

/// Stake balances, delegate totals, and who backs whom
///
/// Every mutating method either fully applies or returns an error with
/// no state changed.
#[derive(Clone, Debug, Default)]
pub struct StakeRegistry {
    voters: BTreeMap<VoterId, Voter>,
    delegates: BTreeMap<DelegateId, Delegate>,
    ballots: BTreeMap<VoterId, Ballot>,
}

impl StakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // === REGISTRATION ===

    pub fn register_voter(&mut self, id: VoterId, stake: u64) -> Result<(), VotingError> {
        if self.voters.contains_key(&id) {
            return Err(VotingError::DuplicateVoter(id));
        }
        self.voters.insert(id.clone(), Voter { id, stake });
        Ok(())
    }

    /// Change a voter's stake. Applies to future votes only.
    pub fn update_stake(&mut self, id: &VoterId, stake: u64) -> Result<(), VotingError> {
        let voter = self
            .voters
            .get_mut(id)
            .ok_or_else(|| VotingError::UnknownVoter(id.clone()))?;
        voter.stake = stake;
        Ok(())
    }

    /// Remove a voter, retracting their ballot first
    pub fn remove_voter(&mut self, id: &VoterId) -> Result<Voter, VotingError> {
        if !self.voters.contains_key(id) {
            return Err(VotingError::UnknownVoter(id.clone()));
        }
        if let Some(ballot) = self.ballots.remove(id) {
            self.withdraw(&ballot);
        }
        self.voters
            .remove(id)
            .ok_or_else(|| VotingError::UnknownVoter(id.clone()))
    }

    pub fn register_delegate(&mut self, id: DelegateId) -> Result<(), VotingError> {
        if self.delegates.contains_key(&id) {
            return Err(VotingError::DuplicateDelegate(id));
        }
        self.delegates.insert(id.clone(), Delegate::new(id));
        Ok(())
    }

    /// Remove a delegate and drop every ballot that backs it
    pub fn remove_delegate(&mut self, id: &DelegateId) -> Result<Delegate, VotingError> {
        let delegate = self
            .delegates
            .remove(id)
            .ok_or_else(|| VotingError::UnknownDelegate(id.clone()))?;
        self.ballots.retain(|_, ballot| &ballot.delegate != id);
        Ok(delegate)
    }

    // === VOTING ===

    /// Back `delegate_id` with the voter's full current stake
    ///
    /// A prior ballot for a different delegate is retracted first. Voting
    /// again for the same delegate refreshes the ballot to the current
    /// stake; it never counts twice.
    pub fn cast_vote(
        &mut self,
        voter_id: &VoterId,
        delegate_id: &DelegateId,
    ) -> Result<Ballot, VotingError> {
        let stake = self
            .voters
            .get(voter_id)
            .map(|v| v.stake)
            .ok_or_else(|| VotingError::UnknownVoter(voter_id.clone()))?;
        if !self.delegates.contains_key(delegate_id) {
            return Err(VotingError::UnknownDelegate(delegate_id.clone()));
        }

        if let Some(previous) = self.ballots.remove(voter_id) {
            self.withdraw(&previous);
        }

        let ballot = Ballot {
            delegate: delegate_id.clone(),
            weight: stake,
        };
        if let Some(delegate) = self.delegates.get_mut(delegate_id) {
            delegate.accumulated_votes += u128::from(stake);
        }
        self.ballots.insert(voter_id.clone(), ballot.clone());

        debug!(voter = %voter_id, delegate = %delegate_id, weight = stake, "Vote cast");
        Ok(ballot)
    }

    /// Withdraw the voter's ballot, subtracting exactly what it contributed
    pub fn retract_vote(&mut self, voter_id: &VoterId) -> Result<Ballot, VotingError> {
        if !self.voters.contains_key(voter_id) {
            return Err(VotingError::UnknownVoter(voter_id.clone()));
        }
        let ballot = self
            .ballots
            .remove(voter_id)
            .ok_or_else(|| VotingError::NoActiveVote(voter_id.clone()))?;
        self.withdraw(&ballot);

        debug!(voter = %voter_id, delegate = %ballot.delegate, weight = ballot.weight, "Vote retracted");
        Ok(ballot)
    }

    fn withdraw(&mut self, ballot: &Ballot) {
        if let Some(delegate) = self.delegates.get_mut(&ballot.delegate) {
            delegate.accumulated_votes -= u128::from(ballot.weight);
        }
    }

    // === QUERIES ===

    pub fn stake_of(&self, voter_id: &VoterId) -> Result<u64, VotingError> {
        self.voters
            .get(voter_id)
            .map(|v| v.stake)
            .ok_or_else(|| VotingError::UnknownVoter(voter_id.clone()))
    }

    pub fn votes_of(&self, delegate_id: &DelegateId) -> Result<u128, VotingError> {
        self.delegates
            .get(delegate_id)
            .map(|d| d.accumulated_votes)
            .ok_or_else(|| VotingError::UnknownDelegate(delegate_id.clone()))
    }

    /// Delegate the voter currently backs
    pub fn backing(&self, voter_id: &VoterId) -> Option<&DelegateId> {
        self.ballots.get(voter_id).map(|b| &b.delegate)
    }

    pub fn delegate(&self, id: &DelegateId) -> Option<&Delegate> {
        self.delegates.get(id)
    }

    /// Delegates in identity order
    pub fn delegates(&self) -> impl Iterator<Item = &Delegate> {
        self.delegates.values()
    }

    pub(crate) fn delegates_mut(&mut self) -> impl Iterator<Item = &mut Delegate> {
        self.delegates.values_mut()
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub fn delegate_count(&self) -> usize {
        self.delegates.len()
    }
}
