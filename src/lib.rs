//! # Restaurant Seating
//!
//! Seating allocator for a restaurant with a fixed set of tables (2 to 6 chairs each).
//!
//! Groups of 1 to 6 clients arrive, wait in a queue and are seated by an allocator
//! pass. A group never spans tables, but several groups may share one table while its
//! free chairs last. Groups may leave at any time, seated or not.
//!
//! ## Key Features
//!
//! - **Deterministic allocation**: exact empty table, then the smallest larger empty
//!   table, then the first table with enough free chairs
//! - **Starvation bypass**: a group that fits nowhere does not block smaller groups
//!   behind it
//! - **Single writer**: every floor mutation runs on one admission worker thread, fed
//!   by a bounded, backpressured channel
//! - **Non-blocking lookups**: group state is read from a concurrent registry
//!
//! ```rust,ignore
//! use restaurant_seating::builders::SeatingManagerBuilder;
//! use restaurant_seating::config::SeatingConfig;
//!
//! let manager = SeatingManagerBuilder::new(SeatingConfig::new(vec![2, 3, 4, 5, 6])).build()?;
//! let id = manager.arrive(3)?;
//! manager.flush()?;
//! let seating = manager.lookup(id)?;
//! manager.leave(id)?;
//! manager.shutdown();
//! ```
//!
//! For complete usage, see `tests/seating_manager_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Seating domain: tables, queue, allocator, admission pipeline and manager.
pub mod core;
/// Configuration models for tables, the admission pipeline and audit.
pub mod config;
/// Builders to construct a seating manager from configuration.
pub mod builders;
/// Infrastructure adapters for the group registry.
pub mod infra;
/// Transport-agnostic API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
