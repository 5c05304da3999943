//! Configuration models for tables, the admission pipeline and audit.

pub mod seating;

pub use seating::{
    PipelineConfig, SeatingConfig, ShutdownPolicy, TablesConfig, DEFAULT_AUDIT_CAPACITY,
    DEFAULT_PIPELINE_CAPACITY,
};
