//! Round-robin proposer rotation over the elected committee
//!
//! Reseed policy: the cursor follows the delegate it pointed at. If that
//! delegate survives the election the cursor moves to its new index,
//! otherwise the cursor resets to 0.

use super::{DelegateId, RotationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What `reseed` did with the cursor
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReseedOutcome {
    /// The next proposer survived and keeps its turn
    Preserved { proposer: DelegateId, cursor: usize },
    /// The next proposer was not re-elected (or there was none)
    Reset,
}

/// Read-only view of the rotation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSnapshot {
    pub order: Vec<DelegateId>,
    pub cursor: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ProposerRotation {
    order: Vec<DelegateId>,
    cursor: usize,
}

impl ProposerRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(order: Vec<DelegateId>) -> Self {
        let mut rotation = Self::new();
        rotation.reseed(order);
        rotation
    }

    /// The delegate authorized to propose next, without advancing
    pub fn current_proposer(&self) -> Result<&DelegateId, RotationError> {
        self.order
            .get(self.cursor)
            .ok_or(RotationError::NoActiveDelegates)
    }

    /// Return the current proposer and move the cursor to the next one
    pub fn advance(&mut self) -> Result<DelegateId, RotationError> {
        let proposer = self.current_proposer()?.clone();
        self.cursor = (self.cursor + 1) % self.order.len();
        Ok(proposer)
    }

    /// Replace the order after an election
    ///
    /// Duplicate identities are dropped, keeping the first occurrence.
    pub fn reseed(&mut self, new_order: Vec<DelegateId>) -> ReseedOutcome {
        let pending = self.order.get(self.cursor).cloned();

        let mut seen = HashSet::with_capacity(new_order.len());
        self.order = new_order
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let remapped = pending.and_then(|proposer| {
            self.order
                .iter()
                .position(|id| *id == proposer)
                .map(|cursor| (proposer, cursor))
        });

        match remapped {
            Some((proposer, cursor)) => {
                self.cursor = cursor;
                ReseedOutcome::Preserved { proposer, cursor }
            }
            None => {
                self.cursor = 0;
                ReseedOutcome::Reset
            }
        }
    }

    pub fn order(&self) -> &[DelegateId] {
        &self.order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn snapshot(&self) -> RotationSnapshot {
        RotationSnapshot {
            order: self.order.clone(),
            cursor: self.cursor,
        }
    }
}
