//! Domain layer for the ledger
//!
//! - block / block_validation / chain: the hash-linked ledger
//! - stake: voter stake and delegate vote accounting
//! - election: committee selection
//! - rotation: round-robin proposer order

mod block;
mod block_validation;
mod chain;
mod election;
mod error;
mod rotation;
mod stake;
mod token;

pub use block::*;
pub use block_validation::*;
pub use chain::*;
pub use election::*;
pub use error::*;
pub use rotation::*;
pub use stake::*;
pub use token::*;
