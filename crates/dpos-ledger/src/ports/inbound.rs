//! Driving ports (Inbound API)
//!
//! All operations complete synchronously; implementations enforce their
//! own mutual exclusion so these are safe to call from concurrent handlers.

use crate::domain::{
    Ballot, Block, DelegateId, ElectionResult, LedgerResult, Record, ReseedOutcome,
    RotationSnapshot, VoterId,
};

/// Ledger append and read API (consumed by the request layer)
pub trait LedgerApi: Send + Sync {
    /// Append a new block carrying `payload`
    ///
    /// Under `ProposerPolicy::Enforced`, `proposer` must be the current
    /// proposer. On success the rotation advances.
    fn add_block(&self, proposer: Option<&DelegateId>, payload: Record) -> LedgerResult<Block>;

    /// Build a candidate against the current tail without appending it
    fn build_candidate(&self, payload: Record) -> Block;

    /// Validate and append a candidate built earlier
    ///
    /// Fails with a retryable chain error if the tail moved in between.
    fn submit_block(
        &self,
        proposer: Option<&DelegateId>,
        candidate: Block,
    ) -> LedgerResult<Block>;

    /// Owned copy of the full chain
    fn snapshot(&self) -> Vec<Block>;

    /// Last appended block
    fn tail(&self) -> Block;
}

/// Vote API (consumed by the governance request layer)
pub trait GovernanceApi: Send + Sync {
    fn cast_vote(&self, voter: &VoterId, delegate: &DelegateId) -> LedgerResult<Ballot>;

    fn retract_vote(&self, voter: &VoterId) -> LedgerResult<Ballot>;

    fn stake_of(&self, voter: &VoterId) -> LedgerResult<u64>;

    fn votes_of(&self, delegate: &DelegateId) -> LedgerResult<u128>;
}

/// Election and rotation API (consumed by the scheduling collaborator)
pub trait SchedulingApi: Send + Sync {
    /// Elect a committee and reseed the rotation in one step
    fn run_election(&self) -> ElectionResult;

    /// Hand out the next proposer
    fn advance(&self) -> LedgerResult<DelegateId>;

    /// Peek at the next proposer
    fn current_proposer(&self) -> LedgerResult<DelegateId>;

    /// Replace the rotation order directly
    fn reseed(&self, order: Vec<DelegateId>) -> ReseedOutcome;

    fn committee(&self) -> ElectionResult;

    fn rotation(&self) -> RotationSnapshot;
}
