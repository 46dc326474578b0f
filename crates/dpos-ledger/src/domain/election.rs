//! Delegate election
//!
//! Ranks delegates by accumulated votes (descending), breaking ties by
//! identity (ascending), and activates the top `committee_size`.

use super::{Delegate, DelegateId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// One elected delegate and the votes it was elected with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeMember {
    pub id: DelegateId,
    pub votes: u128,
}

/// Ranked committee produced by [`elect`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResult {
    pub committee_size: usize,
    pub members: Vec<CommitteeMember>,
}

impl ElectionResult {
    /// Committee identities in rank order
    pub fn order(&self) -> Vec<DelegateId> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &DelegateId) -> bool {
        self.members.iter().any(|m| &m.id == id)
    }

    pub fn total_votes(&self) -> u128 {
        self.members.iter().map(|m| m.votes).sum()
    }
}

/// Elect the top `committee_size` delegates and set `is_active` on every delegate
///
/// Deterministic for a given set of vote totals regardless of input order.
/// With fewer delegates than seats every delegate is elected; with none the
/// committee is empty.
pub fn elect<'a, I>(delegates: I, committee_size: usize) -> ElectionResult
where
    I: IntoIterator<Item = &'a mut Delegate>,
{
    let mut ranked: Vec<&'a mut Delegate> = delegates.into_iter().collect();
    ranked.sort_by(|a, b| {
        (Reverse(a.accumulated_votes), &a.id).cmp(&(Reverse(b.accumulated_votes), &b.id))
    });

    let mut members = Vec::with_capacity(committee_size.min(ranked.len()));
    for (rank, delegate) in ranked.into_iter().enumerate() {
        delegate.is_active = rank < committee_size;
        if delegate.is_active {
            members.push(CommitteeMember {
                id: delegate.id.clone(),
                votes: delegate.accumulated_votes,
            });
        }
    }

    ElectionResult {
        committee_size,
        members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delegate(id: &str, votes: u128) -> Delegate {
        Delegate {
            id: DelegateId::new(id),
            accumulated_votes: votes,
            is_active: false,
        }
    }

    #[test]
    fn test_top_two_of_three() {
        let mut delegates = vec![delegate("A", 50), delegate("B", 30), delegate("C", 10)];
        let result = elect(delegates.iter_mut(), 2);

        assert_eq!(result.order(), vec![DelegateId::new("A"), DelegateId::new("B")]);
        assert!(delegates[0].is_active);
        assert!(delegates[1].is_active);
        assert!(!delegates[2].is_active);
    }

    #[test]
    fn test_ties_break_by_identity() {
        let mut delegates = vec![delegate("carol", 10), delegate("alice", 10), delegate("bob", 10)];
        let result = elect(delegates.iter_mut(), 2);
        assert_eq!(
            result.order(),
            vec![DelegateId::new("alice"), DelegateId::new("bob")]
        );
        assert!(!delegates[0].is_active);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut forward = vec![delegate("A", 5), delegate("B", 9), delegate("C", 5)];
        let mut backward = vec![delegate("C", 5), delegate("B", 9), delegate("A", 5)];
        assert_eq!(elect(forward.iter_mut(), 3), elect(backward.iter_mut(), 3));
    }

    #[test]
    fn test_idempotent() {
        let mut delegates = vec![delegate("A", 1), delegate("B", 2)];
        let first = elect(delegates.iter_mut(), 1);
        let second = elect(delegates.iter_mut(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fewer_delegates_than_seats() {
        let mut delegates = vec![delegate("A", 0), delegate("B", 0)];
        let result = elect(delegates.iter_mut(), 5);
        assert_eq!(result.len(), 2);
        assert!(delegates.iter().all(|d| d.is_active));
    }

    #[test]
    fn test_no_delegates() {
        let mut delegates: Vec<Delegate> = Vec::new();
        let result = elect(delegates.iter_mut(), 3);
        assert!(result.is_empty());
        assert_eq!(result.committee_size, 3);
    }

    #[test]
    fn test_reelection_deactivates_losers() {
        let mut delegates = vec![delegate("A", 10), delegate("B", 5)];
        elect(delegates.iter_mut(), 1);
        assert!(delegates[0].is_active);

        delegates[1].accumulated_votes = 20;
        let result = elect(delegates.iter_mut(), 1);
        assert_eq!(result.order(), vec![DelegateId::new("B")]);
        assert!(!delegates[0].is_active);
        assert!(delegates[1].is_active);
    }
}
