//! # dpos-ledger
//!
//! Hash-linked ledger whose block proposers are scheduled by delegated
//! proof-of-stake.
//!
//! ## Architecture
//!
//! ```text
//!   voters ──cast_vote──→ [StakeRegistry] ──elect──→ [ElectionResult]
//!                                                         │ reseed
//!                                                         ↓
//!   submitter ──add_block──→ [LedgerService] ←──── [ProposerRotation]
//!                                  │
//!                                  ↓
//!                             [HashChain]
//! ```
//!
//! Every block commits to its position, timestamp, payload, and the hash
//! of its predecessor. A block is appended only if it validates against
//! the current tail, so the chain is always a single valid sequence even
//! under concurrent submitters.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dpos_ledger::{LedgerConfig, LedgerService, LedgerApi, SchedulingApi, Record};
//!
//! let service = LedgerService::new(LedgerConfig::default())?;
//! service.register_voter("alice".into(), 50)?;
//! service.register_delegate("A".into())?;
//! service.cast_vote(&"alice".into(), &"A".into())?;
//! service.run_election();
//!
//! let block = service.add_block(None, Record::new("nft-1", "alice", "2023-03-01"))?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod state;

// Re-export main types
pub use adapters::ContentHashMinter;
pub use config::{LedgerConfig, ProposerPolicy, DEFAULT_COMMITTEE_SIZE};
pub use domain::{
    elect, verify_chain, Ballot, Block, BlockHash, ChainError, CommitteeMember, ConfigError,
    Delegate, DelegateId, ElectionResult, HashChain, LedgerError, LedgerResult, ProposerRotation,
    Record, ReseedOutcome, RotationError, RotationSnapshot, StakeRegistry, Token, Voter, VoterId,
    VotingError,
};
pub use ports::{
    GovernanceApi, LedgerApi, ManualClock, SchedulingApi, SystemTimeSource, TimeSource,
    TokenMinter,
};
pub use service::LedgerService;
