//! Table data model.

use serde::{Deserialize, Serialize};

use crate::core::SeatingError;
use crate::util::serde::TableId;

/// Smallest table capacity accepted at construction.
pub const MIN_TABLE_SIZE: u32 = 2;
/// Largest table capacity accepted at construction.
pub const MAX_TABLE_SIZE: u32 = 6;

/// A fixed-capacity seating unit.
///
/// The table only tracks how many seats are taken, not which groups took them.
/// Occupancy changes go through [`TableInventory`](crate::core::TableInventory) so the
/// empty-table index stays in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    id: TableId,
    capacity: u32,
    occupied: u32,
}

impl Table {
    /// Create an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::InvalidTableSize`] if `capacity` is outside 2..=6.
    pub fn new(id: TableId, capacity: u32) -> Result<Self, SeatingError> {
        if !(MIN_TABLE_SIZE..=MAX_TABLE_SIZE).contains(&capacity) {
            return Err(SeatingError::InvalidTableSize(capacity));
        }
        Ok(Self {
            id,
            capacity,
            occupied: 0,
        })
    }

    /// Table identifier.
    #[must_use]
    pub const fn id(&self) -> TableId {
        self.id
    }

    /// Number of chairs.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Chairs currently taken.
    #[must_use]
    pub const fn occupied(&self) -> u32 {
        self.occupied
    }

    /// Chairs still free.
    #[must_use]
    pub const fn free_seats(&self) -> u32 {
        self.capacity - self.occupied
    }

    /// True when nobody sits at the table.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// True when a group of `group_size` fits in the free chairs.
    #[must_use]
    pub const fn fits(&self, group_size: u32) -> bool {
        group_size <= self.free_seats()
    }

    pub(crate) fn occupy(&mut self, seats: u32) -> Result<(), SeatingError> {
        if !self.fits(seats) {
            return Err(SeatingError::CapacityExceeded {
                table: self.id,
                requested: seats,
                free: self.free_seats(),
            });
        }
        self.occupied += seats;
        Ok(())
    }

    pub(crate) fn release(&mut self, seats: u32) -> Result<(), SeatingError> {
        if seats > self.occupied {
            return Err(SeatingError::NegativeCapacity {
                table: self.id,
                requested: seats,
                occupied: self.occupied,
            });
        }
        self.occupied -= seats;
        Ok(())
    }
}
