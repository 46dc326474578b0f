//! Driven ports (Outbound dependencies)

use crate::domain::Token;
use std::sync::atomic::{AtomicU64, Ordering};

/// Time source for block timestamps
pub trait TimeSource: Send + Sync {
    /// Current time in milliseconds since the Unix epoch
    fn now_millis(&self) -> u64;
}

/// Default time source using system time
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Manually driven clock (for testing)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(start_millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Mints identifiers for new records, independent of chain logic
pub trait TokenMinter: Send + Sync {
    /// Assign `token_id` and return the minted token
    fn mint(&self, token: Token) -> Token;
}
