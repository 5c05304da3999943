//! Infrastructure adapters for collaborator stores.

pub mod registry;

pub use registry::{GroupRegistry, InMemoryGroupRegistry};
