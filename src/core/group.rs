//! Clients group data model.

use serde::{Deserialize, Serialize};

use crate::core::SeatingError;
use crate::util::serde::{GroupId, TableId};

/// Smallest accepted party.
pub const MIN_GROUP_SIZE: u32 = 1;
/// Largest accepted party.
pub const MAX_GROUP_SIZE: u32 = 6;

/// Validated party size (1..=6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GroupSize(u32);

impl GroupSize {
    /// Validate a raw party size.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::InvalidGroupSize`] if `size` is outside 1..=6.
    pub fn new(size: u32) -> Result<Self, SeatingError> {
        if size < MIN_GROUP_SIZE || size > MAX_GROUP_SIZE {
            return Err(SeatingError::InvalidGroupSize(size));
        }
        Ok(Self(size))
    }

    /// Number of clients.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for GroupSize {
    type Error = SeatingError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupSize> for u32 {
    fn from(value: GroupSize) -> Self {
        value.0
    }
}

/// Where a seated group sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seating {
    /// Assigned table.
    pub table: TableId,
    /// Capacity of the assigned table.
    pub capacity: u32,
}

/// Registry record of a party, from arrival to departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientsGroup {
    /// Group identity.
    pub id: GroupId,
    /// Number of clients.
    pub size: GroupSize,
    /// Current table, `None` while waiting.
    pub table: Option<Seating>,
    /// Arrival time (ms since epoch).
    pub arrived_at_ms: u128,
}

impl ClientsGroup {
    /// New, unseated group.
    #[must_use]
    pub const fn new(id: GroupId, size: GroupSize, arrived_at_ms: u128) -> Self {
        Self {
            id,
            size,
            table: None,
            arrived_at_ms,
        }
    }

    /// True once the floor has assigned a table.
    #[must_use]
    pub const fn is_seated(&self) -> bool {
        self.table.is_some()
    }
}
