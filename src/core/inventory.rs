//! Table inventory with an empty-table index bucketed by capacity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::TablesConfig;
use crate::core::{SeatingError, Table};
use crate::util::serde::TableId;

/// Point-in-time view of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Table identifier.
    pub id: TableId,
    /// Number of chairs.
    pub capacity: u32,
    /// Chairs taken.
    pub occupied: u32,
}

/// All tables of the restaurant plus the capacity -> empty tables index.
///
/// Invariants (hold whenever a method returns):
/// - every table with `occupied == 0` is listed exactly once under its capacity,
///   and no other table is listed;
/// - the index never stores an empty bucket.
#[derive(Debug, Clone)]
pub struct TableInventory {
    tables: Vec<Table>,
    /// Table ids sorted ascending by capacity, ties in configuration order.
    by_capacity: Vec<TableId>,
    empty: BTreeMap<u32, Vec<TableId>>,
}

impl TableInventory {
    /// Build an inventory of empty tables, one per capacity, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::InvalidTableSize`] for a capacity outside 2..=6.
    pub fn new<I>(capacities: I) -> Result<Self, SeatingError>
    where
        I: IntoIterator<Item = u32>,
    {
        let tables = capacities
            .into_iter()
            .enumerate()
            .map(|(idx, capacity)| Table::new(TableId(idx), capacity))
            .collect::<Result<Vec<_>, _>>()?;

        let mut by_capacity: Vec<TableId> = tables.iter().map(Table::id).collect();
        // Stable sort keeps configuration order within one capacity.
        by_capacity.sort_by_key(|id| tables[id.0].capacity());

        let mut empty: BTreeMap<u32, Vec<TableId>> = BTreeMap::new();
        for id in &by_capacity {
            empty.entry(tables[id.0].capacity()).or_default().push(*id);
        }

        Ok(Self {
            tables,
            by_capacity,
            empty,
        })
    }

    /// Build from the `tables` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`SeatingError::InvalidTableSize`] for a capacity outside 2..=6.
    pub fn from_config(cfg: &TablesConfig) -> Result<Self, SeatingError> {
        Self::new(cfg.sizes.iter().copied())
    }

    /// Seat `size` clients at `table`.
    ///
    /// # Errors
    ///
    /// [`SeatingError::TableNotFound`] for an unknown id,
    /// [`SeatingError::CapacityExceeded`] if the group does not fit.
    pub fn seat(&mut self, table: TableId, size: u32) -> Result<(), SeatingError> {
        let entry = self
            .tables
            .get_mut(table.0)
            .ok_or(SeatingError::TableNotFound(table))?;
        let was_empty = entry.is_empty();
        entry.occupy(size)?;

        if was_empty && !entry.is_empty() {
            let capacity = entry.capacity();
            self.remove_empty(capacity, table);
        }
        Ok(())
    }

    /// Release `size` seats at `table`.
    ///
    /// # Errors
    ///
    /// [`SeatingError::TableNotFound`] for an unknown id,
    /// [`SeatingError::NegativeCapacity`] if fewer than `size` seats are occupied.
    pub fn vacate(&mut self, table: TableId, size: u32) -> Result<(), SeatingError> {
        let entry = self
            .tables
            .get_mut(table.0)
            .ok_or(SeatingError::TableNotFound(table))?;
        let was_empty = entry.is_empty();
        entry.release(size)?;

        if !was_empty && entry.is_empty() {
            let capacity = entry.capacity();
            self.empty.entry(capacity).or_default().push(table);
        }
        Ok(())
    }

    /// Currently empty tables with capacity exactly `size`, in the order they became empty.
    #[must_use]
    pub fn empty_tables_of_size(&self, size: u32) -> &[TableId] {
        self.empty.get(&size).map_or(&[], Vec::as_slice)
    }

    /// First empty table of the smallest capacity strictly greater than `size`.
    #[must_use]
    pub fn empty_table_larger_than(&self, size: u32) -> Option<TableId> {
        self.empty
            .range(size.saturating_add(1)..)
            .find_map(|(_, ids)| ids.first().copied())
    }

    /// All tables, ascending by capacity. Fixed at construction.
    pub fn tables_by_capacity(&self) -> impl Iterator<Item = &Table> + '_ {
        self.by_capacity.iter().map(|id| &self.tables[id.0])
    }

    /// First table in ascending-capacity order with at least `size` free seats,
    /// empty or not.
    #[must_use]
    pub fn first_fit(&self, size: u32) -> Option<TableId> {
        self.tables_by_capacity()
            .find(|table| table.fits(size))
            .map(Table::id)
    }

    /// Look up a table.
    #[must_use]
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0)
    }

    /// All tables in configuration order.
    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True if the inventory holds no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Occupancy of every table, in configuration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TableSnapshot> {
        self.tables
            .iter()
            .map(|t| TableSnapshot {
                id: t.id(),
                capacity: t.capacity(),
                occupied: t.occupied(),
            })
            .collect()
    }

    fn remove_empty(&mut self, capacity: u32, table: TableId) {
        if let Some(ids) = self.empty.get_mut(&capacity) {
            ids.retain(|id| *id != table);
            if ids.is_empty() {
                self.empty.remove(&capacity);
            }
        }
    }
}
