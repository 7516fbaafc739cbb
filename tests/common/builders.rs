//! Test builders: ergonomic constructors for configs, engines and reports.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use super::fake_engine_api::FakeEngineApi;
use esbench_core::config::{Config, ConnectionConfig};
use esbench_core::{BenchmarkReport, FieldMapping, FieldType, IndexConfig, QueryResult, Replication};
use esbench_engine::HttpEngine;

// ---------------------------------------------------------------------------
// Connections
// ---------------------------------------------------------------------------

/// Default connection settings pointed at `endpoints`, with a short timeout.
pub fn connection(endpoints: &[String]) -> ConnectionConfig {
    let mut config = Config::defaults().connection;
    config.endpoints = endpoints.to_vec();
    config.timeout_secs = 5;
    config
}

/// An engine handle talking to `api` only.
pub fn engine_for(api: &FakeEngineApi) -> HttpEngine {
    HttpEngine::connect(&connection(&[api.base_url()])).unwrap()
}

// ---------------------------------------------------------------------------
// IndexBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`IndexConfig`] fixtures.
///
/// ```rust
/// let index = IndexBuilder::new("patients").replicas(2).field("AGE", FieldType::Integer).build();
/// ```
pub struct IndexBuilder {
    name: String,
    replication: Replication,
    fields: Vec<FieldMapping>,
}

impl IndexBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), replication: Replication { shards: 1, replicas: 0 }, fields: vec![] }
    }

    pub fn shards(mut self, shards: u32) -> Self {
        self.replication.shards = shards;
        self
    }

    pub fn replicas(mut self, replicas: u32) -> Self {
        self.replication.replicas = replicas;
        self
    }

    pub fn field(mut self, name: &str, field_type: FieldType) -> Self {
        self.fields.push(FieldMapping::new(name, field_type));
        self
    }

    pub fn build(self) -> IndexConfig {
        IndexConfig::new(self.name, self.replication, self.fields).unwrap()
    }
}

// ---------------------------------------------------------------------------
// ReportBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`BenchmarkReport`] fixtures.
pub struct ReportBuilder {
    report: BenchmarkReport,
}

impl ReportBuilder {
    pub fn new(index: &str) -> Self {
        Self {
            report: BenchmarkReport {
                index: index.to_string(),
                declared: Replication { shards: 1, replicas: 0 },
                effective: None,
                results: vec![],
                generated_at: chrono::Utc::now(),
            },
        }
    }

    pub fn result(mut self, label: &str, shape: &str, took_ms: u64) -> Self {
        self.report.results.push(QueryResult {
            label: label.to_string(),
            shape: shape.to_string(),
            took_ms,
            hits: Some(100),
            raw: None,
        });
        self
    }

    pub fn effective(mut self, shards: u32, replicas: u32) -> Self {
        self.report.effective = Some(Replication { shards, replicas });
        self
    }

    pub fn build(self) -> BenchmarkReport {
        self.report
    }
}
