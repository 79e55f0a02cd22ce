//! Bounded record of completed transitions.
//!
//! Recording is off by default; machines built with
//! [`MachineBuilder::journal_capacity`](crate::MachineBuilder::journal_capacity)
//! keep the most recent transitions, evicting the oldest once the capacity
//! is reached. Only transitions that ran to completion are recorded. Requests
//! dropped by the lock, by the reentrancy guard, or by a failed hook leave no
//! entry.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed transition.
///
/// `None` endpoints mean the machine was, or became, idle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Name of the state that was exited, if any.
    pub from: Option<String>,
    /// Name of the state that was entered, if any.
    pub to: Option<String>,
    /// When the transition completed.
    pub at: DateTime<Utc>,
}

impl JournalEntry {
    /// Whether this entry left the machine idle.
    pub fn cleared(&self) -> bool {
        self.to.is_none()
    }
}

/// A capacity-bounded log of [`JournalEntry`] values, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionJournal {
    entries: VecDeque<JournalEntry>,
    capacity: usize,
}

impl TransitionJournal {
    /// A journal that records nothing.
    pub fn disabled() -> Self {
        Self::with_capacity(0)
    }

    /// A journal that keeps at most `capacity` entries. Zero disables
    /// recording entirely.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub(crate) fn record(&mut self, from: Option<&str>, to: Option<&str>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(JournalEntry {
            from: from.map(str::to_owned),
            to: to.map(str::to_owned),
            at: Utc::now(),
        });
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether this journal records at all.
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&JournalEntry> {
        self.entries.back()
    }

    /// Iterates entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    /// Drops all recorded entries. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
