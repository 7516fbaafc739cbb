//! esbench-core: query benchmark orchestrator core.
//!
//! This crate holds the engine-agnostic layers of a benchmark run plus the
//! types shared across all of them.
//!
//! # Architecture
//!
//! ```text
//! Provisioner ──► Runner ──► Reporter
//!      │            │
//!      └── SearchEngine (trait) ──► esbench-engine (REST)
//! ```
//!
//! Everything runs sequentially: the provisioner finishes before the first
//! query is sent, and each query is awaited before the next one.

pub mod config;
pub mod engine;
pub mod error;
pub mod predicate;
pub mod provision;
pub mod query;
pub mod runner;
pub mod suite;
pub mod types;

pub use engine::{ClusterInfo, SearchEngine, SearchResponse};
pub use error::{BenchError, EngineError, FailedStage, QueryParseError, RenderError};
pub use predicate::{Bound, Predicate, Scalar};
pub use suite::{QuerySpec, QuerySuite};
pub use types::{BenchmarkReport, FieldMapping, FieldType, IndexConfig, QueryResult, Replication};
