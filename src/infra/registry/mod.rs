//! Group registry backends.

pub mod memory;

pub use memory::InMemoryGroupRegistry;

use crate::core::{ClientsGroup, GroupSize, Seating, SeatingError};
use crate::util::serde::GroupId;

/// Store of group records, keyed by identifier.
///
/// Implementations must be safe for concurrent use from request threads and the
/// admission worker.
pub trait GroupRegistry: Send + Sync {
    /// Register a new, unseated group and return its record with a fresh id.
    fn create(&self, size: GroupSize) -> ClientsGroup;

    /// Remove a departing group, mark it departed and return its last known record.
    ///
    /// # Errors
    ///
    /// [`SeatingError::GroupNotFound`] if the id is unknown or already departed.
    fn remove(&self, id: GroupId) -> Result<ClientsGroup, SeatingError>;

    /// Drop a record without marking it departed (arrival rejected before the id was
    /// handed out). Returns false if the id is unknown.
    fn discard(&self, id: GroupId) -> bool;

    /// True if the group was issued and has since left.
    fn is_departed(&self, id: GroupId) -> bool;

    /// Current record of a group, if registered.
    fn get(&self, id: GroupId) -> Option<ClientsGroup>;

    /// Record the group's table (or clear it). Returns false if the group is unknown.
    fn assign(&self, id: GroupId, seating: Option<Seating>) -> bool;

    /// Number of registered groups (departed groups excluded).
    fn len(&self) -> usize;

    /// True if no group is registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
