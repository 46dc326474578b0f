//! Block domain entities
//!
//! A block binds its position, timestamp, payload and predecessor hash
//! under a single SHA-256 digest. The canonical encoding below is the only
//! encoding ever hashed; construction and validation both go through
//! [`compute_block_hash`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Domain separator prefixed to every block digest
const BLOCK_DIGEST_DOMAIN: &[u8] = b"dpos-ledger/block/v1";

/// 32-byte SHA-256 block digest
///
/// Renders as lowercase hex. The all-zero hash (the genesis predecessor)
/// renders as the empty string.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHash([u8; 32]);

impl BlockHash {
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Hex form, empty for the zero hash
    pub fn to_hex(&self) -> String {
        if self.is_zero() {
            String::new()
        } else {
            hex::encode(self.0)
        }
    }

    /// Parse the hex form produced by [`BlockHash::to_hex`]
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        if s.is_empty() {
            return Ok(Self::zero());
        }
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Self(out))
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            f.write_str("<none>")
        } else {
            f.write_str(&hex::encode(self.0))
        }
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self)
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BlockHash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Record carried by a block
///
/// The ledger treats it as opaque apart from the genesis marker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier minted by the token collaborator
    pub record_id: String,
    pub owner: String,
    pub acquired_at: String,
    #[serde(default)]
    pub is_genesis: bool,
}

impl Record {
    pub fn new(
        record_id: impl Into<String>,
        owner: impl Into<String>,
        acquired_at: impl Into<String>,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            owner: owner.into(),
            acquired_at: acquired_at.into(),
            is_genesis: false,
        }
    }

    /// The distinguished payload of block 0
    pub fn genesis() -> Self {
        Self {
            is_genesis: true,
            ..Self::default()
        }
    }

    /// Deterministic, length-prefixed encoding in fixed field order
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            25 + self.record_id.len() + self.owner.len() + self.acquired_at.len(),
        );
        for field in [&self.record_id, &self.owner, &self.acquired_at] {
            out.extend_from_slice(&(field.len() as u64).to_le_bytes());
            out.extend_from_slice(field.as_bytes());
        }
        out.push(u8::from(self.is_genesis));
        out
    }
}

/// One immutable entry of the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub position: u64,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub payload: Record,
    pub previous_hash: BlockHash,
    pub hash: BlockHash,
}

impl Block {
    /// Build a block and seal it with its digest
    pub fn seal(position: u64, timestamp: u64, payload: Record, previous_hash: BlockHash) -> Self {
        let hash = compute_block_hash(position, timestamp, &payload, &previous_hash);
        Self {
            position,
            timestamp,
            payload,
            previous_hash,
            hash,
        }
    }

    /// Position 0, zero predecessor, genesis payload
    pub fn genesis(timestamp: u64) -> Self {
        Self::seal(0, timestamp, Record::genesis(), BlockHash::zero())
    }

    /// Recompute the digest from this block's own fields
    pub fn recompute_hash(&self) -> BlockHash {
        compute_block_hash(
            self.position,
            self.timestamp,
            &self.payload,
            &self.previous_hash,
        )
    }

    pub fn is_genesis(&self) -> bool {
        self.position == 0 && self.previous_hash.is_zero()
    }
}

/// The block digest used for both construction and validation
pub fn compute_block_hash(
    position: u64,
    timestamp: u64,
    payload: &Record,
    previous_hash: &BlockHash,
) -> BlockHash {
    let payload_bytes = payload.canonical_bytes();
    let mut hasher = Sha256::new();
    hasher.update(BLOCK_DIGEST_DOMAIN);
    hasher.update(position.to_le_bytes());
    hasher.update(timestamp.to_le_bytes());
    hasher.update((payload_bytes.len() as u64).to_le_bytes());
    hasher.update(&payload_bytes);
    hasher.update(previous_hash.as_bytes());
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hasher.finalize());
    BlockHash(hash)
}
