//! Block validation rules
//!
//! Checks run cheapest first: linkage, then position, then the digest.

use super::{Block, ChainError};

/// Validate `candidate` as the direct successor of `previous`
///
/// Enforces:
/// - `candidate.previous_hash == previous.hash`
/// - `candidate.position == previous.position + 1`
/// - `candidate.hash` equals the digest recomputed from its own fields
pub fn validate_block(candidate: &Block, previous: &Block) -> Result<(), ChainError> {
    if candidate.previous_hash != previous.hash {
        return Err(ChainError::InvalidLinkage {
            position: candidate.position,
            expected: previous.hash,
            actual: candidate.previous_hash,
        });
    }

    let expected_position = previous.position.saturating_add(1);
    if candidate.position != expected_position {
        return Err(ChainError::InvalidPosition {
            expected: expected_position,
            actual: candidate.position,
        });
    }

    verify_seal(candidate)
}

/// A successor may share its predecessor's timestamp but never precede it
pub fn check_timestamp_order(candidate: &Block, previous: &Block) -> Result<(), ChainError> {
    if candidate.timestamp < previous.timestamp {
        return Err(ChainError::TimestampRegression {
            position: candidate.position,
            previous: previous.timestamp,
            actual: candidate.timestamp,
        });
    }
    Ok(())
}

/// Only block 0 may carry the genesis payload
pub fn check_payload_marker(candidate: &Block) -> Result<(), ChainError> {
    if candidate.payload.is_genesis {
        return Err(ChainError::ReservedGenesisMarker {
            position: candidate.position,
        });
    }
    Ok(())
}

/// Everything a stored successor must satisfy: the three structural checks,
/// then timestamp order and the genesis marker
pub fn validate_successor(candidate: &Block, previous: &Block) -> Result<(), ChainError> {
    validate_block(candidate, previous)?;
    check_timestamp_order(candidate, previous)?;
    check_payload_marker(candidate)
}

/// Boolean form of [`validate_block`]
pub fn is_valid_block(candidate: &Block, previous: &Block) -> bool {
    validate_block(candidate, previous).is_ok()
}

/// Check that a block's stored hash matches its recomputed digest
pub fn verify_seal(block: &Block) -> Result<(), ChainError> {
    let recomputed = block.recompute_hash();
    if recomputed != block.hash {
        return Err(ChainError::HashMismatch {
            position: block.position,
            stored: block.hash,
            recomputed,
        });
    }
    Ok(())
}

/// Check the shape and seal of a genesis block
pub fn validate_genesis(block: &Block) -> Result<(), ChainError> {
    if block.position != 0 {
        return Err(ChainError::InvalidGenesis(format!(
            "position is {}",
            block.position
        )));
    }
    if !block.previous_hash.is_zero() {
        return Err(ChainError::InvalidGenesis(
            "previous hash is not empty".to_string(),
        ));
    }
    if !block.payload.is_genesis {
        return Err(ChainError::InvalidGenesis(
            "payload lacks the genesis marker".to_string(),
        ));
    }
    verify_seal(block)
}

/// Audit a full chain, returning the first violation found
pub fn verify_chain(blocks: &[Block]) -> Result<(), ChainError> {
    let Some(genesis) = blocks.first() else {
        return Err(ChainError::InvalidGenesis("chain is empty".to_string()));
    };
    validate_genesis(genesis)?;

    for pair in blocks.windows(2) {
        validate_successor(&pair[1], &pair[0])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlockHash, Record};

    fn build_chain(len: u64) -> Vec<Block> {
        let mut blocks = vec![Block::genesis(1_000)];
        for i in 1..len {
            let prev = blocks.last().unwrap();
            let payload = Record::new(format!("r{i}"), "alice", "today");
            blocks.push(Block::seal(i, prev.timestamp + 1, payload, prev.hash));
        }
        blocks
    }

    #[test]
    fn test_valid_successor() {
        let chain = build_chain(2);
        assert!(validate_block(&chain[1], &chain[0]).is_ok());
        assert!(is_valid_block(&chain[1], &chain[0]));
    }

    #[test]
    fn test_wrong_parent_is_linkage_error() {
        let chain = build_chain(3);
        let err = validate_block(&chain[2], &chain[0]).unwrap_err();
        assert!(matches!(err, ChainError::InvalidLinkage { .. }));
    }

    #[test]
    fn test_position_skip_is_position_error() {
        let chain = build_chain(1);
        let skipped = Block::seal(5, 2_000, Record::new("x", "y", "z"), chain[0].hash);
        let err = validate_block(&skipped, &chain[0]).unwrap_err();
        assert_eq!(
            err,
            ChainError::InvalidPosition {
                expected: 1,
                actual: 5
            }
        );
    }

    #[test]
    fn test_tampered_payload_is_hash_mismatch() {
        let chain = build_chain(2);
        let mut tampered = chain[1].clone();
        tampered.payload.owner = "mallory".to_string();
        let err = validate_block(&tampered, &chain[0]).unwrap_err();
        assert!(matches!(err, ChainError::HashMismatch { position: 1, .. }));
    }

    #[test]
    fn test_tampered_timestamp_is_hash_mismatch() {
        let chain = build_chain(2);
        let mut tampered = chain[1].clone();
        tampered.timestamp += 1;
        assert!(matches!(
            validate_block(&tampered, &chain[0]),
            Err(ChainError::HashMismatch { .. })
        ));
    }

    #[test]
    fn test_verify_chain() {
        let mut chain = build_chain(5);
        assert!(verify_chain(&chain).is_ok());

        chain[3].payload.record_id = "forged".to_string();
        assert!(matches!(
            verify_chain(&chain),
            Err(ChainError::HashMismatch { position: 3, .. })
        ));
    }

    #[test]
    fn test_verify_chain_detects_moved_position() {
        let mut chain = build_chain(5);
        chain[2].position = 7;

        // The moved block no longer follows block 1
        assert_eq!(
            verify_chain(&chain),
            Err(ChainError::InvalidPosition {
                expected: 2,
                actual: 7
            })
        );
    }

    #[test]
    fn test_verify_chain_detects_timestamp_regression() {
        let mut chain = build_chain(2);
        let backdated = Block::seal(2, 0, Record::new("late", "bob", "today"), chain[1].hash);
        chain.push(backdated);

        assert_eq!(
            verify_chain(&chain),
            Err(ChainError::TimestampRegression {
                position: 2,
                previous: 1_001,
                actual: 0
            })
        );
    }

    #[test]
    fn test_equal_timestamps_are_allowed() {
        let chain = build_chain(1);
        let same = Block::seal(1, 1_000, Record::new("a", "b", "c"), chain[0].hash);
        assert!(validate_successor(&same, &chain[0]).is_ok());
    }

    #[test]
    fn test_genesis_marker_after_block_zero() {
        let chain = build_chain(1);
        let fake = Block::seal(1, 1_000, Record::genesis(), chain[0].hash);

        // Structurally sound, but not a valid successor
        assert!(validate_block(&fake, &chain[0]).is_ok());
        assert_eq!(
            validate_successor(&fake, &chain[0]),
            Err(ChainError::ReservedGenesisMarker { position: 1 })
        );
    }

    #[test]
    fn test_verify_chain_rejects_bad_genesis() {
        assert!(verify_chain(&[]).is_err());

        let fake = Block::seal(0, 1, Record::new("a", "b", "c"), BlockHash::zero());
        assert!(matches!(
            verify_chain(&[fake]),
            Err(ChainError::InvalidGenesis(_))
        ));
    }
}
