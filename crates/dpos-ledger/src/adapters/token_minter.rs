//! Content-hash token identifiers

use crate::domain::Token;
use crate::ports::TokenMinter;
use sha2::{Digest, Sha256};

/// Derives `token_id` from the token's metadata and creation date
///
/// Minting the same metadata at the same time always yields the same id.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentHashMinter;

impl ContentHashMinter {
    pub fn token_id(metadata: &str, created_on: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(metadata.as_bytes());
        hasher.update(created_on.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl TokenMinter for ContentHashMinter {
    fn mint(&self, mut token: Token) -> Token {
        token.token_id = Self::token_id(&token.metadata, &token.created_on);
        token
    }
}
