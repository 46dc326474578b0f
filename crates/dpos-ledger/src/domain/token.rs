//! Minted token description
//!
//! Tokens are produced outside the chain and referenced from a block's
//! [`Record`](super::Record) by `token_id`.

use super::Record;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Assigned by the minter; ignored on input
    #[serde(default)]
    pub token_id: String,
    pub name: String,
    pub owner: String,
    pub created_on: String,
    pub metadata: String,
}

impl Token {
    /// Record that transfers this token to `owner` at `acquired_at`
    pub fn to_record(
        &self,
        owner: impl Into<String>,
        acquired_at: impl Into<String>,
    ) -> Record {
        Record::new(self.token_id.clone(), owner, acquired_at)
    }
}
