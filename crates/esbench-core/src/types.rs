//! Core types for esbench-core.
//!
//! The index schema ([`IndexConfig`], [`FieldMapping`]), the shard/replica
//! layout of an index ([`Replication`]) and the output of a benchmark run
//! ([`QueryResult`], [`BenchmarkReport`]).

use crate::error::BenchError;
use serde::{Deserialize, Serialize};

/// Declared type of an index field, spelled the way the engine expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Long,
    Short,
    Byte,
    Double,
    Float,
    Boolean,
    Keyword,
    Text,
    Date,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Short => "short",
            FieldType::Byte => "byte",
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Keyword => "keyword",
            FieldType::Text => "text",
            FieldType::Date => "date",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the index schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldMapping {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self { name: name.into(), field_type }
    }
}

/// Shard and replica counts of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replication {
    pub shards: u32,
    pub replicas: u32,
}

/// Target index: name, layout and schema.
///
/// Only ever used to *create* an index. Once the index exists this system
/// never changes it; a different layout on an existing index is reported,
/// not corrected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub name: String,
    pub replication: Replication,
    pub fields: Vec<FieldMapping>,
}

impl IndexConfig {
    /// Build a validated index config.
    ///
    /// Index names follow the engine's rules: non-empty, lowercase, no
    /// whitespace or `/\*?"<>|,#:`, and not starting with `-`, `_` or `+`.
    /// Shards must be at least 1 and field names must be unique.
    pub fn new(
        name: impl Into<String>,
        replication: Replication,
        fields: Vec<FieldMapping>,
    ) -> Result<Self, BenchError> {
        let name = name.into();
        validate_index_name(&name)?;

        if replication.shards == 0 {
            return Err(BenchError::Config(format!(
                "index `{name}` must have at least one shard"
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for field in &fields {
            if field.name.trim().is_empty() {
                return Err(BenchError::Config(format!(
                    "index `{name}` has a field with an empty name"
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(BenchError::Config(format!(
                    "field `{}` is mapped twice in index `{name}`",
                    field.name
                )));
            }
        }

        Ok(Self { name, replication, fields })
    }
}

fn validate_index_name(name: &str) -> Result<(), BenchError> {
    const FORBIDDEN: &[char] = &['/', '\\', '*', '?', '"', '<', '>', '|', ',', '#', ':'];

    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.starts_with(['-', '_', '+']) {
        Some("must not start with `-`, `_` or `+`")
    } else if name.chars().any(char::is_uppercase) {
        Some("must be lowercase")
    } else if name.chars().any(|c| c.is_whitespace() || FORBIDDEN.contains(&c)) {
        Some("contains a forbidden character")
    } else if name == "." || name == ".." {
        Some("must not be `.` or `..`")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(BenchError::Config(format!("index name {name:?} {reason}"))),
        None => Ok(()),
    }
}

/// Outcome of executing one query of the suite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Label of the query spec that produced this result.
    pub label: String,
    /// Rendered predicate tree, e.g. `AND(SEX=2, AGE≥60)`.
    pub shape: String,
    /// Execution time reported by the engine (`took`), in milliseconds.
    pub took_ms: u64,
    /// Total hit count, when the engine reported one.
    pub hits: Option<u64>,
    /// Full response body, only kept when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

/// Everything one benchmark run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub index: String,
    /// Layout the index was declared with.
    pub declared: Replication,
    /// Layout read back from the engine at report time.
    pub effective: Option<Replication>,
    /// One entry per suite query, in suite order.
    pub results: Vec<QueryResult>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl BenchmarkReport {
    /// `(label, took_ms)` pairs in run order: the table every sink consumes.
    pub fn timings(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.results.iter().map(|r| (r.label.as_str(), r.took_ms))
    }

    /// True when the engine reports a layout different from the declared one.
    pub fn layout_drift(&self) -> bool {
        self.effective.is_some_and(|eff| eff != self.declared)
    }
}
