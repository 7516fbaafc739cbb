//! Benchmark Runner: executes a query suite once, in order.
//!
//! Queries run strictly one after another; each is awaited before the next
//! is sent so no measurement overlaps another. The first failure aborts the
//! run. Nothing is cached between runs and nothing is retried.

use crate::engine::SearchEngine;
use crate::error::BenchError;
use crate::query;
use crate::suite::QuerySuite;
use crate::types::{BenchmarkReport, IndexConfig, QueryResult};

/// Knobs for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Keep each full response body on its [`QueryResult`].
    pub keep_raw: bool,
}

/// Execute every query of `suite` against `index`.
///
/// The engine is pinged first so an unreachable cluster fails as a
/// [`BenchError::Connection`] before any query is sent. The returned report
/// has one result per suite entry, in suite order, and no effective layout
/// yet (that is read at report time).
pub async fn run<E: SearchEngine>(
    engine: &E,
    index: &IndexConfig,
    suite: &QuerySuite,
    options: RunOptions,
) -> Result<BenchmarkReport, BenchError> {
    run_observed(engine, index, suite, options, |_, _| {}).await
}

/// Like [`run`], calling `observe(n, result)` once the n-th query (1-based)
/// has completed.
pub async fn run_observed<E, F>(
    engine: &E,
    index: &IndexConfig,
    suite: &QuerySuite,
    options: RunOptions,
    mut observe: F,
) -> Result<BenchmarkReport, BenchError>
where
    E: SearchEngine,
    F: FnMut(usize, &QueryResult),
{
    let info = engine.ping().await.map_err(BenchError::Connection)?;
    tracing::debug!(cluster = ?info.cluster_name, version = ?info.version, "engine reachable");

    let total = suite.len();
    let mut results = Vec::with_capacity(total);

    for (i, spec) in suite.iter().enumerate() {
        let body = query::request_body(&spec.predicate);
        tracing::debug!(label = %spec.label, body = %body, "submitting query");

        let response = engine
            .search(&index.name, &body)
            .await
            .map_err(|source| BenchError::QueryExecution { label: spec.label.clone(), source })?;

        tracing::info!(
            label = %spec.label,
            took_ms = response.took_ms,
            hits = ?response.hits,
            "query {}/{total} done",
            i + 1
        );

        let result = QueryResult {
            label: spec.label.clone(),
            shape: spec.shape(),
            took_ms: response.took_ms,
            hits: response.hits,
            raw: options.keep_raw.then_some(response.raw),
        };
        observe(i + 1, &result);
        results.push(result);
    }

    Ok(BenchmarkReport {
        index: index.name.clone(),
        declared: index.replication,
        effective: None,
        results,
        generated_at: chrono::Utc::now(),
    })
}
