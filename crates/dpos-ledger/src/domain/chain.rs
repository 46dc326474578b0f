//! Hash-linked chain of blocks
//!
//! `HashChain` exclusively owns the block sequence. Mutation requires
//! `&mut self`, so "read tail, validate, append" is a single step for
//! whoever holds the write side.

use super::{validate_successor, verify_chain, Block, ChainError, Record};
use crate::metrics;
use crate::ports::TimeSource;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Append-only ordered sequence of blocks, never empty
pub struct HashChain {
    blocks: Vec<Block>,
    clock: Arc<dyn TimeSource>,
}

impl HashChain {
    /// Create a chain holding only a freshly built genesis block
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        let genesis = Self::genesis(clock.as_ref());
        info!(hash = %genesis.hash, "Genesis block created");
        Self {
            blocks: vec![genesis],
            clock,
        }
    }

    /// Build the genesis block
    pub fn genesis(clock: &dyn TimeSource) -> Block {
        Block::genesis(clock.now_millis())
    }

    /// Build a successor of `previous` without touching chain state
    ///
    /// The timestamp never goes below the predecessor's, even if the
    /// clock steps backwards.
    pub fn append(&self, previous: &Block, payload: Record) -> Block {
        let timestamp = self.clock.now_millis().max(previous.timestamp);
        Block::seal(
            previous.position + 1,
            timestamp,
            payload,
            previous.hash,
        )
    }

    /// Build a block against the current tail, validate it, and extend the chain
    pub fn add_block(&mut self, payload: Record) -> Result<Block, ChainError> {
        let candidate = self.append(self.tail(), payload);
        self.submit(candidate.clone())?;
        Ok(candidate)
    }

    /// Validate an externally built candidate against the current tail and append it
    ///
    /// On failure the chain is left unchanged. A candidate built against a
    /// tail that has since moved is reported as a retryable linkage or
    /// position error. A backdated timestamp or a genesis payload is refused.
    pub fn submit(&mut self, candidate: Block) -> Result<(), ChainError> {
        if let Err(err) = validate_successor(&candidate, self.tail()) {
            self.report_rejection(&candidate, &err);
            return Err(err);
        }

        info!(
            position = candidate.position,
            hash = %candidate.hash,
            record_id = %candidate.payload.record_id,
            "Block appended"
        );
        metrics::record_block_appended();
        self.blocks.push(candidate);
        Ok(())
    }

    fn report_rejection(&self, candidate: &Block, err: &ChainError) {
        metrics::record_block_rejected(err.reason());
        if err.is_corruption() {
            error!(
                position = candidate.position,
                hash = %candidate.hash,
                error = %err,
                "Block rejected: contents are inconsistent"
            );
        } else if err.is_retryable() {
            warn!(
                position = candidate.position,
                tail_position = self.tail().position,
                tail_hash = %self.tail().hash,
                error = %err,
                "Block rejected: stale against current tail"
            );
        } else {
            warn!(position = candidate.position, error = %err, "Block rejected");
        }
    }

    /// Last block of the chain
    pub fn tail(&self) -> &Block {
        // The genesis block is inserted on construction and blocks are never removed
        &self.blocks[self.blocks.len() - 1]
    }

    /// Position of the tail block
    pub fn height(&self) -> u64 {
        self.tail().position
    }

    /// Number of blocks including genesis
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Never true: the chain always holds genesis
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block at `position`, if appended
    pub fn get(&self, position: u64) -> Option<&Block> {
        usize::try_from(position)
            .ok()
            .and_then(|idx| self.blocks.get(idx))
    }

    /// Owned copy of the full chain for rendering
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    /// Re-audit every stored block
    pub fn verify(&self) -> Result<(), ChainError> {
        verify_chain(&self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ManualClock;

    fn chain_with_clock() -> (HashChain, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        (HashChain::new(clock.clone()), clock)
    }

    fn record(id: &str) -> Record {
        Record::new(id, "alice", "2023-03-01")
    }

    #[test]
    fn test_genesis_then_two_appends() {
        let (mut chain, clock) = chain_with_clock();
        let genesis = chain.tail().clone();
        assert_eq!(genesis.position, 0);
        assert_eq!(genesis.previous_hash.to_hex(), "");

        clock.advance(10);
        let p1 = chain.add_block(record("P1")).unwrap();
        assert_eq!(p1.position, 1);
        assert_eq!(p1.previous_hash, genesis.hash);

        let p2 = chain.add_block(record("P2")).unwrap();
        assert_eq!(p2.position, 2);
        assert_eq!(p2.previous_hash, p1.hash);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.height(), 2);
    }

    #[test]
    fn test_append_does_not_mutate() {
        let (chain, _) = chain_with_clock();
        let candidate = chain.append(chain.tail(), record("x"));
        assert_eq!(candidate.position, 1);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_timestamp_never_regresses() {
        let (mut chain, clock) = chain_with_clock();
        clock.set(5_000);
        let first = chain.add_block(record("a")).unwrap();

        clock.set(2_000);
        let second = chain.add_block(record("b")).unwrap();
        assert_eq!(second.timestamp, first.timestamp);
    }

    #[test]
    fn test_stale_candidate_is_rejected_without_mutation() {
        let (mut chain, _) = chain_with_clock();
        let genesis = chain.tail().clone();

        let winner = chain.append(&genesis, record("winner"));
        let loser = chain.append(&genesis, record("loser"));

        chain.submit(winner).unwrap();
        let err = chain.submit(loser).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(chain.len(), 2);

        // Rebuilt against the new tail it goes through
        let retried = chain.append(chain.tail(), record("loser"));
        assert!(chain.submit(retried).is_ok());
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_forged_candidate_is_corruption() {
        let (mut chain, _) = chain_with_clock();
        let mut forged = chain.append(chain.tail(), record("a"));
        forged.payload.owner = "mallory".to_string();

        let err = chain.submit(forged).unwrap_err();
        assert!(err.is_corruption());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_backdated_candidate_is_rejected() {
        let (mut chain, _) = chain_with_clock();
        let genesis = chain.tail().clone();
        let backdated = Block::seal(1, 0, record("old"), genesis.hash);

        let err = chain.submit(backdated).unwrap_err();
        assert!(matches!(err, ChainError::TimestampRegression { .. }));
        assert!(err.is_corruption());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_genesis_payload_is_refused_after_block_zero() {
        let (mut chain, _) = chain_with_clock();

        let err = chain.add_block(Record::genesis()).unwrap_err();
        assert_eq!(err, ChainError::ReservedGenesisMarker { position: 1 });
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let (mut chain, _) = chain_with_clock();
        chain.add_block(record("a")).unwrap();

        let mut snapshot = chain.snapshot();
        snapshot[1].payload.owner = "changed".to_string();
        assert_eq!(chain.get(1).unwrap().payload.owner, "alice");
        assert!(chain.verify().is_ok());
    }

    #[test]
    fn test_get_out_of_range() {
        let (chain, _) = chain_with_clock();
        assert!(chain.get(0).is_some());
        assert!(chain.get(1).is_none());
        assert!(!chain.is_empty());
    }
}
