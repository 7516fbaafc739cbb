//! The seam between the benchmark pipeline and a concrete search engine.
//!
//! [`SearchEngine`] covers exactly the calls the pipeline makes: a liveness
//! check, the three index-management calls and search. `esbench-engine`
//! implements it over the REST API; tests implement it in memory.

use crate::error::EngineError;
use crate::types::{IndexConfig, Replication};
use std::future::Future;

/// What a successful search returned.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    /// Engine-measured execution time in milliseconds.
    pub took_ms: u64,
    pub hits: Option<u64>,
    pub raw: serde_json::Value,
}

/// Identity of the cluster answering the ping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClusterInfo {
    pub cluster_name: Option<String>,
    pub version: Option<String>,
}

/// A connection handle to a search engine. Implementations own their
/// transport; dropping the handle releases it.
pub trait SearchEngine {
    /// Check the engine is reachable and accepts our credentials.
    fn ping(&self) -> impl Future<Output = Result<ClusterInfo, EngineError>> + Send;

    fn index_exists(&self, index: &str) -> impl Future<Output = Result<bool, EngineError>> + Send;

    fn create_index(&self, config: &IndexConfig) -> impl Future<Output = Result<(), EngineError>> + Send;

    /// Run one search. `body` is a complete request body (`{"query": …}`).
    fn search(
        &self,
        index: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<SearchResponse, EngineError>> + Send;

    fn index_settings(&self, index: &str) -> impl Future<Output = Result<Replication, EngineError>> + Send;
}
