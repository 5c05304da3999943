//! FIFO waiting queue of unseated groups.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::GroupSize;
use crate::util::serde::GroupId;

/// Queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingGroup {
    /// Group identity.
    pub id: GroupId,
    /// Party size.
    pub size: GroupSize,
    /// Arrival time (ms since epoch).
    pub arrived_at_ms: u128,
}

/// Groups awaiting a table, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct WaitingQueue {
    groups: VecDeque<WaitingGroup>,
}

impl WaitingQueue {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail. A group already queued is not added twice.
    pub fn push_back(&mut self, group: WaitingGroup) -> bool {
        if self.contains(group.id) {
            return false;
        }
        self.groups.push_back(group);
        true
    }

    /// Remove a group wherever it sits in the queue.
    pub fn remove(&mut self, id: GroupId) -> Option<WaitingGroup> {
        let pos = self.groups.iter().position(|g| g.id == id)?;
        self.groups.remove(pos)
    }

    /// True if the group is queued.
    #[must_use]
    pub fn contains(&self, id: GroupId) -> bool {
        self.groups.iter().any(|g| g.id == id)
    }

    /// Copy of the queue as it is now; used as the iteration order of a pass.
    #[must_use]
    pub fn snapshot(&self) -> Vec<WaitingGroup> {
        self.groups.iter().copied().collect()
    }

    /// Queued ids in order.
    #[must_use]
    pub fn ids(&self) -> Vec<GroupId> {
        self.groups.iter().map(|g| g.id).collect()
    }

    /// Iterate in queue order.
    pub fn iter(&self) -> impl Iterator<Item = &WaitingGroup> + '_ {
        self.groups.iter()
    }

    /// Number of queued groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if nobody is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<WaitingGroup> for WaitingQueue {
    fn from_iter<I: IntoIterator<Item = WaitingGroup>>(iter: I) -> Self {
        let mut queue = Self::new();
        for group in iter {
            queue.push_back(group);
        }
        queue
    }
}
