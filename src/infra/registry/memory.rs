//! In-memory group registry.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::core::{ClientsGroup, GroupSize, Seating, SeatingError};
use crate::infra::registry::GroupRegistry;
use crate::util::clock::now_ms;
use crate::util::serde::GroupId;

#[derive(Debug, Default)]
struct Records {
    groups: HashMap<GroupId, ClientsGroup>,
    /// Tombstones of groups that left; kept for the registry's lifetime.
    departed: HashSet<GroupId>,
}

/// Registry backed by a `RwLock`ed hash map (read-heavy: lookups dominate).
#[derive(Debug, Default)]
pub struct InMemoryGroupRegistry {
    records: RwLock<Records>,
}

impl InMemoryGroupRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of departed groups remembered.
    #[must_use]
    pub fn departed_len(&self) -> usize {
        self.records.read().departed.len()
    }
}

impl GroupRegistry for InMemoryGroupRegistry {
    fn create(&self, size: GroupSize) -> ClientsGroup {
        let group = ClientsGroup::new(GroupId::new(), size, now_ms());
        self.records.write().groups.insert(group.id, group.clone());
        group
    }

    fn remove(&self, id: GroupId) -> Result<ClientsGroup, SeatingError> {
        let mut records = self.records.write();
        let group = records
            .groups
            .remove(&id)
            .ok_or(SeatingError::GroupNotFound(id))?;
        records.departed.insert(id);
        Ok(group)
    }

    fn discard(&self, id: GroupId) -> bool {
        self.records.write().groups.remove(&id).is_some()
    }

    fn is_departed(&self, id: GroupId) -> bool {
        self.records.read().departed.contains(&id)
    }

    fn get(&self, id: GroupId) -> Option<ClientsGroup> {
        self.records.read().groups.get(&id).cloned()
    }

    fn assign(&self, id: GroupId, seating: Option<Seating>) -> bool {
        self.records
            .write()
            .groups
            .get_mut(&id)
            .map(|group| group.table = seating)
            .is_some()
    }

    fn len(&self) -> usize {
        self.records.read().groups.len()
    }
}
