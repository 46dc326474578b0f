//! Adapters layer
//!
//! Implementations of the outbound ports.

mod token_minter;

pub use token_minter::ContentHashMinter;
