use crate::domain::{
    elect, Delegate, DelegateId, ElectionResult, HashChain, ProposerRotation, ReseedOutcome,
    StakeRegistry, VotingError,
};
use crate::ports::TimeSource;
use parking_lot::RwLock;
use std::sync::Arc;

/// Vote accounting, the current committee, and the rotation derived from it.
/// Held under one lock so an election and its reseed are a single step.
#[derive(Default)]
pub struct Governance {
    pub registry: StakeRegistry,
    pub committee: ElectionResult,
    pub rotation: ProposerRotation,
}

impl Governance {
    /// Elect a new committee and reseed the rotation from it
    pub fn run_election(&mut self, committee_size: usize) -> (ElectionResult, ReseedOutcome) {
        let committee = elect(self.registry.delegates_mut(), committee_size);
        let outcome = self.rotation.reseed(committee.order());
        self.committee = committee.clone();
        (committee, outcome)
    }

    /// Unregister a delegate and take it out of the committee and rotation.
    /// The remaining members keep their rank; no election is run.
    pub fn remove_delegate(
        &mut self,
        id: &DelegateId,
    ) -> Result<(Delegate, ReseedOutcome), VotingError> {
        let removed = self.registry.remove_delegate(id)?;
        self.committee.members.retain(|member| &member.id != id);
        let outcome = self.rotation.reseed(self.committee.order());
        Ok((removed, outcome))
    }
}

/// Encapsulates the mutable state of the ledger service.
///
/// Lock order is always `governance` then `chain`.
pub struct LedgerState {
    pub chain: RwLock<HashChain>,
    pub governance: RwLock<Governance>,
}

impl LedgerState {
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            chain: RwLock::new(HashChain::new(clock)),
            governance: RwLock::new(Governance::default()),
        }
    }
}
