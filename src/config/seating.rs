//! Seating and admission pipeline configuration structures.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, MAX_TABLE_SIZE, MIN_TABLE_SIZE};

/// Bounded channel size used when none is configured.
pub const DEFAULT_PIPELINE_CAPACITY: usize = 100;
/// Audit ring-buffer size used when none is configured.
pub const DEFAULT_AUDIT_CAPACITY: usize = 1024;

const DEFAULT_THREAD_NAME: &str = "seating-admission";

/// What the admission worker does with tasks still queued when shutdown is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Run every task already accepted, then stop.
    #[default]
    Drain,
    /// Stop immediately and discard queued tasks (their count is logged).
    Abandon,
}

impl std::str::FromStr for ShutdownPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drain" => Ok(Self::Drain),
            "abandon" => Ok(Self::Abandon),
            other => Err(format!("unknown shutdown policy `{other}`")),
        }
    }
}

/// Table layout of the restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesConfig {
    /// Capacity of every table, one entry per table.
    pub sizes: Vec<u32>,
}

/// Admission pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Bounded channel size; schedulers block when it is full.
    #[serde(default = "default_pipeline_capacity")]
    pub capacity: usize,
    /// Handling of queued tasks at shutdown.
    #[serde(default)]
    pub shutdown: ShutdownPolicy,
    /// Name of the worker thread.
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingConfig {
    /// Table layout.
    pub tables: TablesConfig,
    /// Admission pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Number of audit events kept in memory.
    #[serde(default = "default_audit_capacity")]
    pub audit_capacity: usize,
}

const fn default_pipeline_capacity() -> usize {
    DEFAULT_PIPELINE_CAPACITY
}

const fn default_audit_capacity() -> usize {
    DEFAULT_AUDIT_CAPACITY
}

fn default_thread_name() -> String {
    DEFAULT_THREAD_NAME.into()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineConfig {
    /// Defaults: capacity 100, drain on shutdown.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_PIPELINE_CAPACITY,
            shutdown: ShutdownPolicy::Drain,
            thread_name: default_thread_name(),
        }
    }

    /// Set the bounded channel size.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the shutdown policy.
    #[must_use]
    pub const fn with_shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown = policy;
        self
    }

    /// Set the worker thread name.
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Validate pipeline configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("pipeline capacity must be greater than 0".into());
        }
        if self.thread_name.is_empty() {
            return Err("pipeline thread_name must not be empty".into());
        }
        Ok(())
    }
}

impl TablesConfig {
    /// Validate table sizes: non-empty, each in 2..=6, and every size in 2..=6 present.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.sizes.is_empty() {
            return Err("at least one table must be defined".into());
        }
        if let Some(bad) = self
            .sizes
            .iter()
            .find(|s| !(MIN_TABLE_SIZE..=MAX_TABLE_SIZE).contains(*s))
        {
            return Err(format!(
                "table size {bad} out of range {MIN_TABLE_SIZE}..={MAX_TABLE_SIZE}"
            ));
        }
        let missing: Vec<String> = (MIN_TABLE_SIZE..=MAX_TABLE_SIZE)
            .filter(|size| !self.sizes.contains(size))
            .map(|size| size.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(format!(
                "tables should contain every size from {MIN_TABLE_SIZE} to {MAX_TABLE_SIZE}, missing: {}",
                missing.join(", ")
            ));
        }
        Ok(())
    }
}

impl SeatingConfig {
    /// Config with the given table sizes and default pipeline settings.
    #[must_use]
    pub fn new(sizes: Vec<u32>) -> Self {
        Self {
            tables: TablesConfig { sizes },
            pipeline: PipelineConfig::new(),
            audit_capacity: DEFAULT_AUDIT_CAPACITY,
        }
    }

    /// Replace the pipeline section.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Validate tables and pipeline.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid section.
    pub fn validate(&self) -> Result<(), String> {
        self.tables
            .validate()
            .map_err(|e| format!("tables invalid: {e}"))?;
        self.pipeline
            .validate()
            .map_err(|e| format!("pipeline invalid: {e}"))?;
        if self.audit_capacity == 0 {
            return Err("audit_capacity must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, parsed or validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seating config {}", path.display()))?;
        Self::from_json_str(&raw)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading seating config {}", path.display()))
    }

    /// Build configuration from process environment, loading `.env` first if present.
    ///
    /// Recognized variables: `SEATING_TABLES` (required, comma-separated sizes),
    /// `SEATING_PIPELINE_CAPACITY`, `SEATING_SHUTDOWN_POLICY` (`drain` or `abandon`),
    /// `SEATING_AUDIT_CAPACITY`.
    ///
    /// # Errors
    ///
    /// Returns a description of a missing, malformed or invalid value.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (same keys as [`Self::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns a description of a missing, malformed or invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tables = lookup("SEATING_TABLES").ok_or("SEATING_TABLES is not set")?;
        let sizes = tables
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u32>()
                    .map_err(|e| format!("SEATING_TABLES entry `{s}`: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut cfg = Self::new(sizes);
        if let Some(raw) = lookup("SEATING_PIPELINE_CAPACITY") {
            cfg.pipeline.capacity = raw
                .trim()
                .parse()
                .map_err(|e| format!("SEATING_PIPELINE_CAPACITY: {e}"))?;
        }
        if let Some(raw) = lookup("SEATING_SHUTDOWN_POLICY") {
            cfg.pipeline.shutdown = raw.parse()?;
        }
        if let Some(raw) = lookup("SEATING_AUDIT_CAPACITY") {
            cfg.audit_capacity = raw
                .trim()
                .parse()
                .map_err(|e| format!("SEATING_AUDIT_CAPACITY: {e}"))?;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
