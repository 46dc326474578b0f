//! Ledger Service - composes the chain with delegated proof-of-stake
//!
//! # Concurrency
//! - Appends hold the governance and chain write locks together, so
//!   proposer check, append, and rotation advance happen as one step
//! - Votes hold the governance write lock, so a switch between delegates
//!   is never observed half-applied
//! - An election and the reseed that follows share one governance write lock
//!
//! Lock order is always governance then chain.

use crate::config::{LedgerConfig, ProposerPolicy};
use crate::domain::{
    Ballot, Block, ChainError, Delegate, DelegateId, ElectionResult, LedgerResult, Record,
    ReseedOutcome, RotationSnapshot, StakeRegistry, Voter, VoterId, VotingError,
};
use crate::metrics;
use crate::ports::{GovernanceApi, LedgerApi, SchedulingApi, SystemTimeSource, TimeSource};
use crate::state::{Governance, LedgerState};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ledger Service
pub struct LedgerService {
    state: LedgerState,
    config: LedgerConfig,
}

impl LedgerService {
    /// Create a service with a fresh genesis block, using system time
    pub fn new(config: LedgerConfig) -> LedgerResult<Self> {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    /// Create with a custom time source (for testing)
    pub fn with_time_source(
        config: LedgerConfig,
        time_source: Arc<dyn TimeSource>,
    ) -> LedgerResult<Self> {
        config.validate()?;
        info!(
            committee_size = config.committee_size,
            policy = ?config.proposer_policy,
            "Ledger service created"
        );
        Ok(Self {
            state: LedgerState::new(time_source),
            config,
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Chain height (position of the tail)
    pub fn height(&self) -> u64 {
        self.state.chain.read().height()
    }

    /// Re-audit every stored block
    pub fn verify_chain(&self) -> Result<(), ChainError> {
        self.state.chain.read().verify()
    }

    // === REGISTRATION ===

    /// Apply a mutation from the registration collaborator
    pub fn with_registry<T>(
        &self,
        f: impl FnOnce(&mut StakeRegistry) -> Result<T, VotingError>,
    ) -> LedgerResult<T> {
        let mut governance = self.state.governance.write();
        Ok(f(&mut governance.registry)?)
    }

    pub fn register_voter(&self, voter: VoterId, stake: u64) -> LedgerResult<()> {
        self.with_registry(|registry| registry.register_voter(voter, stake))
    }

    pub fn register_delegate(&self, delegate: DelegateId) -> LedgerResult<()> {
        self.with_registry(|registry| registry.register_delegate(delegate))
    }

    /// Existing ballots keep the weight they were cast with
    pub fn update_stake(&self, voter: &VoterId, stake: u64) -> LedgerResult<()> {
        self.with_registry(|registry| registry.update_stake(voter, stake))
    }

    pub fn remove_voter(&self, voter: &VoterId) -> LedgerResult<Voter> {
        self.with_registry(|registry| registry.remove_voter(voter))
    }

    /// Drops every ballot backing the delegate and takes it out of the
    /// committee. The rotation is reseeded from the remaining members.
    pub fn remove_delegate(&self, delegate: &DelegateId) -> LedgerResult<Delegate> {
        let mut governance = self.state.governance.write();
        let (removed, outcome) = governance.remove_delegate(delegate)?;
        metrics::set_committee_size(governance.committee.len());
        info!(
            delegate = %delegate,
            committee = ?governance.committee.order(),
            reseed = ?outcome,
            "Delegate removed"
        );
        Ok(removed)
    }

    /// Which delegate the voter currently backs
    pub fn backing(&self, voter: &VoterId) -> Option<DelegateId> {
        self.state.governance.read().registry.backing(voter).cloned()
    }

    // === PROPOSER AUTHORIZATION ===

    /// Check the submitter against the rotation according to policy
    fn authorize(
        &self,
        governance: &Governance,
        proposer: Option<&DelegateId>,
    ) -> LedgerResult<()> {
        if self.config.proposer_policy == ProposerPolicy::Open {
            return Ok(());
        }

        let expected = governance.rotation.current_proposer()?;
        if proposer != Some(expected) {
            let err = ChainError::UnauthorizedProposer {
                expected: expected.clone(),
                submitted: proposer.cloned(),
            };
            warn!(error = %err, "Append refused");
            metrics::record_block_rejected(err.reason());
            return Err(err.into());
        }
        Ok(())
    }

    /// Move the rotation on after a successful append
    fn after_append(governance: &mut Governance) {
        // Under the open policy the committee may still be empty
        if let Ok(next) = governance.rotation.advance() {
            debug!(proposer = %next, "Rotation advanced");
        }
    }
}

impl LedgerApi for LedgerService {
    fn add_block(&self, proposer: Option<&DelegateId>, payload: Record) -> LedgerResult<Block> {
        let mut governance = self.state.governance.write();
        self.authorize(&governance, proposer)?;

        let block = self.state.chain.write().add_block(payload)?;
        Self::after_append(&mut governance);
        Ok(block)
    }

    fn build_candidate(&self, payload: Record) -> Block {
        let chain = self.state.chain.read();
        chain.append(chain.tail(), payload)
    }

    fn submit_block(
        &self,
        proposer: Option<&DelegateId>,
        candidate: Block,
    ) -> LedgerResult<Block> {
        let mut governance = self.state.governance.write();
        self.authorize(&governance, proposer)?;

        self.state.chain.write().submit(candidate.clone())?;
        Self::after_append(&mut governance);
        Ok(candidate)
    }

    fn snapshot(&self) -> Vec<Block> {
        self.state.chain.read().snapshot()
    }

    fn tail(&self) -> Block {
        self.state.chain.read().tail().clone()
    }
}

impl GovernanceApi for LedgerService {
    fn cast_vote(&self, voter: &VoterId, delegate: &DelegateId) -> LedgerResult<Ballot> {
        let ballot = self.with_registry(|registry| registry.cast_vote(voter, delegate))?;
        metrics::record_vote_cast();
        Ok(ballot)
    }

    fn retract_vote(&self, voter: &VoterId) -> LedgerResult<Ballot> {
        self.with_registry(|registry| registry.retract_vote(voter))
    }

    fn stake_of(&self, voter: &VoterId) -> LedgerResult<u64> {
        Ok(self.state.governance.read().registry.stake_of(voter)?)
    }

    fn votes_of(&self, delegate: &DelegateId) -> LedgerResult<u128> {
        Ok(self.state.governance.read().registry.votes_of(delegate)?)
    }
}

impl SchedulingApi for LedgerService {
    fn run_election(&self) -> ElectionResult {
        let mut governance = self.state.governance.write();
        let (committee, outcome) = governance.run_election(self.config.committee_size);

        metrics::record_election(committee.len());
        if committee.is_empty() {
            warn!("Election produced an empty committee; rotation has no proposer");
        } else {
            info!(
                committee = ?committee.order(),
                reseed = ?outcome,
                "Committee elected"
            );
        }
        committee
    }

    fn advance(&self) -> LedgerResult<DelegateId> {
        Ok(self.state.governance.write().rotation.advance()?)
    }

    fn current_proposer(&self) -> LedgerResult<DelegateId> {
        let governance = self.state.governance.read();
        let proposer = governance.rotation.current_proposer()?;
        Ok(proposer.clone())
    }

    fn reseed(&self, order: Vec<DelegateId>) -> ReseedOutcome {
        self.state.governance.write().rotation.reseed(order)
    }

    fn committee(&self) -> ElectionResult {
        self.state.governance.read().committee.clone()
    }

    fn rotation(&self) -> RotationSnapshot {
        self.state.governance.read().rotation.snapshot()
    }
}
