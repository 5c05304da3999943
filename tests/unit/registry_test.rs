//! Tests for the group registry through its trait object

use std::sync::Arc;

use restaurant_seating::core::{GroupSize, Seating, SeatingError};
use restaurant_seating::infra::{GroupRegistry, InMemoryGroupRegistry};
use restaurant_seating::util::serde::{GroupId, TableId};

fn registry() -> Arc<dyn GroupRegistry> {
    Arc::new(InMemoryGroupRegistry::new())
}

#[test]
fn test_created_groups_get_distinct_ids() {
    let registry = registry();
    let a = registry.create(GroupSize::new(2).unwrap());
    let b = registry.create(GroupSize::new(2).unwrap());
    assert_ne!(a.id, b.id);
    assert!(!a.is_seated());
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_assign_and_clear_seating() {
    let registry = registry();
    let group = registry.create(GroupSize::new(4).unwrap());
    let seating = Seating {
        table: TableId(0),
        capacity: 4,
    };

    assert!(registry.assign(group.id, Some(seating)));
    assert!(registry.get(group.id).unwrap().is_seated());
    assert!(registry.assign(group.id, None));
    assert!(!registry.get(group.id).unwrap().is_seated());
}

#[test]
fn test_remove_unknown_group() {
    let registry = registry();
    let id = GroupId::new();
    assert!(matches!(
        registry.remove(id),
        Err(SeatingError::GroupNotFound(missing)) if missing == id
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_removed_group_is_departed_not_discarded() {
    let registry = registry();
    let left = registry.create(GroupSize::new(3).unwrap());
    let rejected = registry.create(GroupSize::new(3).unwrap());

    registry.remove(left.id).unwrap();
    assert!(registry.discard(rejected.id));

    assert!(registry.get(left.id).is_none());
    assert!(registry.is_departed(left.id));
    assert!(!registry.is_departed(rejected.id));
    assert!(!registry.is_departed(GroupId::new()));
    assert!(matches!(
        registry.remove(left.id),
        Err(SeatingError::GroupNotFound(_))
    ));
    assert!(registry.is_empty());
}
