//! Election cadence.
//!
//! The core runs an election only when asked. This module decides when to
//! ask: after every Nth appended block, or only on explicit request.

use dpos_ledger::{Block, ElectionResult, LedgerService, SchedulingApi};
use ledger_telemetry::ELECTIONS;
use tracing::info;

/// When the node triggers elections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectionSchedule {
    /// Run an election whenever the appended block's position is a multiple of `n`
    EveryNBlocks(u64),
    /// Only through the election endpoint
    OnDemand,
}

impl ElectionSchedule {
    /// `0` means on demand only
    pub fn from_interval(interval: u64) -> Self {
        match interval {
            0 => ElectionSchedule::OnDemand,
            n => ElectionSchedule::EveryNBlocks(n),
        }
    }

    pub fn is_due(&self, position: u64) -> bool {
        match self {
            ElectionSchedule::EveryNBlocks(n) => *n > 0 && position > 0 && position % n == 0,
            ElectionSchedule::OnDemand => false,
        }
    }

    /// Run an election if `appended` lands on the schedule
    pub fn after_append(&self, ledger: &LedgerService, appended: &Block) -> Option<ElectionResult> {
        if !self.is_due(appended.position) {
            return None;
        }

        let committee = ledger.run_election();
        ELECTIONS.with_label_values(&["schedule"]).inc();
        info!(
            position = appended.position,
            committee = committee.len(),
            "Scheduled election ran"
        );
        Some(committee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpos_ledger::{DelegateId, GovernanceApi, LedgerApi, LedgerConfig, Record};

    #[test]
    fn test_interval_zero_is_on_demand() {
        assert_eq!(ElectionSchedule::from_interval(0), ElectionSchedule::OnDemand);
        assert_eq!(
            ElectionSchedule::from_interval(4),
            ElectionSchedule::EveryNBlocks(4)
        );
    }

    #[test]
    fn test_is_due() {
        let schedule = ElectionSchedule::EveryNBlocks(3);
        let due: Vec<u64> = (0..10).filter(|p| schedule.is_due(*p)).collect();
        assert_eq!(due, vec![3, 6, 9]);
        assert!(!ElectionSchedule::OnDemand.is_due(3));
    }

    #[test]
    fn test_after_append_elects_on_schedule() {
        let ledger = LedgerService::new(LedgerConfig::default()).unwrap();
        ledger.register_voter("alice".into(), 10).unwrap();
        ledger.register_delegate("A".into()).unwrap();
        ledger.cast_vote(&"alice".into(), &"A".into()).unwrap();

        let schedule = ElectionSchedule::EveryNBlocks(2);
        let first = ledger
            .add_block(None, Record::new("t1", "alice", "2023-03-01"))
            .unwrap();
        assert!(schedule.after_append(&ledger, &first).is_none());
        assert!(ledger.committee().is_empty());

        let second = ledger
            .add_block(None, Record::new("t2", "alice", "2023-03-02"))
            .unwrap();
        let committee = schedule.after_append(&ledger, &second).unwrap();
        assert_eq!(committee.order(), vec![DelegateId::new("A")]);
    }
}
