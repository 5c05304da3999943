//! Single-pass seating allocator.
//!
//! For each waiting group, in queue order, the allocator tries:
//!
//! 1. an empty table whose capacity equals the group size,
//! 2. the empty table with the smallest capacity above the group size,
//! 3. the first table (ascending capacity, empty or not) with enough free seats.
//!
//! A group that fits nowhere stays queued and the pass moves on, so a smaller
//! group behind it can still be seated. The pass walks a snapshot of the queue
//! taken when it starts; the inventory is updated after every match, so later
//! groups in the same pass see earlier seatings.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::core::{GroupSize, SeatingError, TableInventory, WaitingQueue};
use crate::util::serde::{GroupId, TableId};

/// Which rule produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Empty table of exactly the group size.
    Exact,
    /// Smallest empty table larger than the group.
    NextLarger,
    /// First table with enough room, possibly shared.
    FirstFit,
}

/// One seating made during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Seated group.
    pub group: GroupId,
    /// Chosen table.
    pub table: TableId,
    /// Capacity of the chosen table.
    pub capacity: u32,
    /// Party size.
    pub size: GroupSize,
    /// Rule that matched.
    pub kind: MatchKind,
}

/// Result of one allocator pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassOutcome {
    /// Seatings in the order they were made.
    pub seated: Vec<Placement>,
    /// Groups still queued after the pass.
    pub still_waiting: usize,
}

/// A pass that stopped on an inventory invariant violation.
///
/// Seatings made before the failure are kept in `outcome`; the failing group and every
/// group after it stay queued.
#[derive(Debug, Error)]
#[error("allocator pass failed after seating {n} groups: {source}", n = .outcome.seated.len())]
pub struct PassError {
    /// Work completed before the failure.
    pub outcome: PassOutcome,
    /// The violation.
    pub source: SeatingError,
}

/// Choose a table for a group of `size` without changing the inventory.
#[must_use]
pub fn find_table(inventory: &TableInventory, size: u32) -> Option<(TableId, MatchKind)> {
    if let Some(id) = inventory.empty_tables_of_size(size).first() {
        return Some((*id, MatchKind::Exact));
    }
    if let Some(id) = inventory.empty_table_larger_than(size) {
        return Some((id, MatchKind::NextLarger));
    }
    inventory
        .first_fit(size)
        .map(|id| (id, MatchKind::FirstFit))
}

/// Run one pass over the waiting queue.
///
/// # Errors
///
/// Returns [`PassError`] on an inventory invariant violation, carrying the seatings
/// made so far.
pub fn run_pass(
    inventory: &mut TableInventory,
    queue: &mut WaitingQueue,
) -> Result<PassOutcome, PassError> {
    let snapshot = queue.snapshot();
    let mut seated = Vec::new();

    for group in snapshot {
        let size = group.size.get();
        let Some((table, kind)) = find_table(inventory, size) else {
            trace!(group_id = %group.id, size, "no table for group, stays queued");
            continue;
        };

        if let Err(source) = inventory.seat(table, size) {
            let still_waiting = queue.len();
            return Err(PassError {
                outcome: PassOutcome {
                    seated,
                    still_waiting,
                },
                source,
            });
        }
        queue.remove(group.id);

        let capacity = inventory.table(table).map_or(0, |t| t.capacity());
        debug!(
            group_id = %group.id,
            table_id = %table,
            size,
            capacity,
            kind = ?kind,
            "table found"
        );
        seated.push(Placement {
            group: group.id,
            table,
            capacity,
            size: group.size,
            kind,
        });
    }

    Ok(PassOutcome {
        seated,
        still_waiting: queue.len(),
    })
}
