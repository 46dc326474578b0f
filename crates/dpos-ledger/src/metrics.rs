//! # Ledger Metrics
//!
//! Prometheus metrics for monitoring the ledger.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! dpos-ledger = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `ledger_blocks_appended_total` - Counter of appended blocks
//! - `ledger_blocks_rejected_total` - Counter of rejected blocks (by reason)
//! - `ledger_elections_total` - Counter of elections run
//! - `ledger_committee_size` - Gauge of the current committee size
//! - `ledger_votes_cast_total` - Counter of votes cast

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total blocks appended to the chain
    pub static ref BLOCKS_APPENDED: IntCounter = register_int_counter!(
        "ledger_blocks_appended_total",
        "Total number of blocks appended"
    )
    .expect("Failed to create BLOCKS_APPENDED metric");

    /// Total blocks rejected, labeled by rejection reason
    pub static ref BLOCKS_REJECTED: IntCounterVec = register_int_counter_vec!(
        "ledger_blocks_rejected_total",
        "Total number of blocks rejected",
        &["reason"]
    )
    .expect("Failed to create BLOCKS_REJECTED metric");

    /// Total elections run
    pub static ref ELECTIONS: IntCounter = register_int_counter!(
        "ledger_elections_total",
        "Total number of delegate elections"
    )
    .expect("Failed to create ELECTIONS metric");

    /// Size of the current committee
    pub static ref COMMITTEE_SIZE: IntGauge = register_int_gauge!(
        "ledger_committee_size",
        "Number of delegates in the current committee"
    )
    .expect("Failed to create COMMITTEE_SIZE metric");

    /// Total votes cast
    pub static ref VOTES_CAST: IntCounter = register_int_counter!(
        "ledger_votes_cast_total",
        "Total number of votes cast"
    )
    .expect("Failed to create VOTES_CAST metric");
}

/// Record an appended block
#[cfg(feature = "metrics")]
pub fn record_block_appended() {
    BLOCKS_APPENDED.inc();
}

/// Record a rejected block with reason
#[cfg(feature = "metrics")]
pub fn record_block_rejected(reason: &str) {
    BLOCKS_REJECTED.with_label_values(&[reason]).inc();
}

/// Record an election and the committee it produced
#[cfg(feature = "metrics")]
pub fn record_election(committee_size: usize) {
    ELECTIONS.inc();
    set_committee_size(committee_size);
}

/// Track a committee that shrank outside an election
#[cfg(feature = "metrics")]
pub fn set_committee_size(committee_size: usize) {
    COMMITTEE_SIZE.set(i64::try_from(committee_size).unwrap_or(i64::MAX));
}

/// Record a cast vote
#[cfg(feature = "metrics")]
pub fn record_vote_cast() {
    VOTES_CAST.inc();
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_block_appended() {}

#[cfg(not(feature = "metrics"))]
pub fn record_block_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_election(_committee_size: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn set_committee_size(_committee_size: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_vote_cast() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_callable_in_any_build() {
        record_block_appended();
        record_block_rejected("test");
        record_election(3);
        record_vote_cast();
    }
}
