//! esbench: query latency benchmark for Elasticsearch-compatible clusters.
//!
//! The binary wires the workspace crates together:
//!
//! ```text
//! cli ──► commands ──► pipeline::Session
//!                         ├── esbench-core   (provision, run)
//!                         ├── esbench-engine (REST transport)
//!                         └── esbench-report (chart, table, JSON)
//! ```
//!
//! Everything runs on a single-threaded runtime, one request at a time.

pub mod cli;
pub mod commands;
pub mod pipeline;

pub use pipeline::{Session, Stage};
