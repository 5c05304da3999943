//! Concurrency tests for SeatingManager
//!
//! Many request threads arrive, look up and leave at random while the admission worker
//! owns the floor. After the dust settles the floor must be consistent:
//! - no table is over capacity
//! - occupancy equals the sum of the seated groups' sizes
//! - every registered group is either seated or waiting, never both

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;

use rand::Rng;
use restaurant_seating::builders::SeatingManagerBuilder;
use restaurant_seating::config::{PipelineConfig, SeatingConfig};
use restaurant_seating::core::SeatingManager;
use restaurant_seating::util::serde::GroupId;

fn busy_floor() -> SeatingManager {
    let cfg = SeatingConfig::new(vec![2, 3, 4, 5, 6, 2, 4, 6])
        .with_pipeline(PipelineConfig::new().with_capacity(8));
    SeatingManagerBuilder::new(cfg).build().unwrap()
}

/// Check the floor against the registry records of `ids`.
fn assert_consistent(manager: &SeatingManager, ids: &[GroupId]) {
    let snapshot = manager.snapshot().unwrap();
    let waiting: HashSet<GroupId> = snapshot.waiting.iter().copied().collect();

    let mut occupied_by_table: HashMap<_, u32> = HashMap::new();
    let mut seated = 0;
    for id in ids {
        let Some(group) = manager.registry().get(*id) else {
            continue;
        };
        match group.table {
            Some(seating) => {
                assert!(!waiting.contains(id), "{id} is both seated and waiting");
                *occupied_by_table.entry(seating.table).or_default() += group.size.get();
                seated += 1;
            }
            None => assert!(waiting.contains(id), "{id} is neither seated nor waiting"),
        }
    }

    assert_eq!(snapshot.seated, seated);
    for table in &snapshot.tables {
        assert!(table.occupied <= table.capacity, "{} over capacity", table.id);
        assert_eq!(
            table.occupied,
            occupied_by_table.get(&table.id).copied().unwrap_or(0),
            "{} occupancy does not match seated groups",
            table.id
        );
    }
}

#[test]
fn test_concurrent_arrivals_and_departures_keep_floor_consistent() {
    let manager = Arc::new(busy_floor());

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let mut rng = rand::rng();
                let mut mine = Vec::new();
                for _ in 0..200 {
                    if mine.is_empty() || rng.random_bool(0.6) {
                        mine.push(manager.arrive(rng.random_range(1..=6)).unwrap());
                    } else {
                        let idx = rng.random_range(0..mine.len());
                        let id = mine.swap_remove(idx);
                        manager.leave(id).unwrap();
                        assert_eq!(manager.lookup(id).unwrap(), None);
                    }
                    if let Some(id) = mine.last() {
                        manager.lookup(*id).unwrap();
                    }
                }
                mine
            })
        })
        .collect();

    let remaining: Vec<GroupId> = workers
        .into_iter()
        .flat_map(|w| w.join().unwrap())
        .collect();
    manager.flush().unwrap();

    assert_eq!(manager.registered_groups(), remaining.len());
    assert_consistent(&manager, &remaining);

    // Everyone leaves: the floor ends empty.
    for id in &remaining {
        manager.leave(*id).unwrap();
    }
    let snapshot = manager.snapshot().unwrap();
    assert_eq!(snapshot.seated, 0);
    assert!(snapshot.waiting.is_empty());
    assert!(snapshot.tables.iter().all(|t| t.occupied == 0));
    manager.shutdown();

    let stats = manager.pipeline_stats();
    assert_eq!(stats.failed_tasks, 0);
    assert_eq!(stats.scheduled_tasks, stats.completed_tasks);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_async_arrivals() {
    let manager = Arc::new(busy_floor());

    let arrivals = (0..64_u32).map(|i| {
        let manager = Arc::clone(&manager);
        async move { manager.arrive_async(i % 6 + 1).await }
    });
    let ids: Vec<GroupId> = futures::future::join_all(arrivals)
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    manager.flush_async().await.unwrap();
    assert_eq!(manager.registered_groups(), 64);
    assert_consistent(&manager, &ids);

    let seated = ids
        .iter()
        .filter(|id| manager.lookup(**id).unwrap().is_some())
        .count();
    assert!(seated > 0);
    assert!(seated < 64, "32 seats cannot hold 64 groups");
    manager.shutdown();
}
