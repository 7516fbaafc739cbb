//! Subcommand handlers.

use crate::cli::{Command, ConnectionArgs, RunArgs};
use crate::pipeline::Session;
use esbench_core::query;
use esbench_core::runner::RunOptions;
use esbench_core::{BenchError, EngineError, QuerySuite, SearchEngine};
use esbench_engine::HttpEngine;
use esbench_report::table;
use esbench_report::{ReportOptions, Reporter, Theme};
use std::future::Future;

pub async fn execute(command: Command) -> Result<(), BenchError> {
    match command {
        Command::Run(args) => run(args).await,
        Command::Suite { json } => {
            print!("{}", describe_suite(&QuerySuite::canonical(), json));
            Ok(())
        }
        Command::Settings(args) => settings(args).await,
    }
}

/// Await `work` unless Ctrl-C arrives first.
async fn cancellable<T>(work: impl Future<Output = Result<T, BenchError>>) -> Result<T, BenchError> {
    tokio::select! {
        result = work => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted, discarding partial results");
            Err(BenchError::Cancelled)
        }
    }
}

fn connect(config: &esbench_core::config::ConnectionConfig) -> Result<HttpEngine, BenchError> {
    HttpEngine::connect(config).map_err(|e| match e {
        EngineError::InvalidEndpoint { .. } => BenchError::Config(e.to_string()),
        other => BenchError::Connection(other),
    })
}

async fn run(args: RunArgs) -> Result<(), BenchError> {
    let config = args.load()?;
    let index = config.index_config()?;
    let theme = Theme::named(&config.report.theme).map_err(|e| BenchError::Config(e.to_string()))?;
    let engine = connect(&config.connection)?;

    tracing::info!(
        endpoint = %engine.endpoint(),
        index = %index.name,
        shards = index.replication.shards,
        replicas = index.replication.replicas,
        "starting benchmark"
    );

    let options = RunOptions { keep_raw: config.report.keep_raw };
    let mut session = Session::new(engine, index, QuerySuite::canonical(), options);

    let report = match cancellable(session.benchmark()).await {
        Ok(report) => report,
        Err(err) => {
            session.fail(&err);
            return Err(err);
        }
    };

    let mut reporter = Reporter::stdout(ReportOptions::from_config(&config.report), theme);
    let errors = session.finish(&mut reporter, &report);
    if !errors.is_empty() {
        tracing::warn!(failed = errors.len(), "some report outputs failed");
    }
    Ok(())
}

async fn settings(args: ConnectionArgs) -> Result<(), BenchError> {
    let config = args.load()?;
    let engine = connect(&config.connection)?;
    let index = &config.index.name;
    let layout = cancellable(async {
        engine.index_settings(index).await.map_err(|source| settings_error(index, source))
    })
    .await?;
    print!("{}", table::render_layout(Some(layout)));
    Ok(())
}

/// Attribute a failed settings read: an unusable cluster is a connection
/// problem, anything the engine answered is about the index itself.
fn settings_error(index: &str, source: EngineError) -> BenchError {
    if source.is_connection_failure() {
        BenchError::Connection(source)
    } else {
        BenchError::Settings { index: index.to_string(), source }
    }
}

/// Text or JSON listing of a suite: label, shape and request body per query.
pub fn describe_suite(suite: &QuerySuite, json: bool) -> String {
    if json {
        let entries: Vec<serde_json::Value> = suite
            .iter()
            .map(|spec| {
                serde_json::json!({
                    "label": spec.label,
                    "shape": spec.shape(),
                    "body": query::request_body(&spec.predicate),
                })
            })
            .collect();
        return serde_json::to_string_pretty(&entries).unwrap_or_default() + "\n";
    }

    let width = suite.iter().map(|s| s.label.len()).max().unwrap_or(0);
    suite
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            format!(
                "{:>2}. {:<width$}  {}\n    {}\n",
                i + 1,
                spec.label,
                spec.shape(),
                query::request_body(&spec.predicate)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_listing_has_one_entry_per_query() {
        let text = describe_suite(&QuerySuite::canonical(), false);
        assert!(text.starts_with(" 1. match_all"));
        assert!(text.contains(r#"{"query":{"match_all":{}}}"#));
        assert_eq!(text.lines().count(), 14);
    }

    #[test]
    fn settings_errors_name_the_failing_stage() {
        let missing = EngineError::Rejected {
            status: 404,
            kind: Some("index_not_found_exception".into()),
            reason: "no such index [covid_data_index]".into(),
        };
        let err = settings_error("covid_data_index", missing);
        assert!(matches!(err, BenchError::Settings { ref index, .. } if index == "covid_data_index"));
        assert_eq!(err.exit_code(), 6);

        let refused = settings_error("covid_data_index", EngineError::Unauthorized { status: 403 });
        assert!(matches!(refused, BenchError::Connection(_)));
    }

    #[test]
    fn json_listing_parses() {
        let text = describe_suite(&QuerySuite::canonical(), true);
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 7);
        assert_eq!(parsed[1]["label"], "term");
        assert_eq!(parsed[1]["body"], serde_json::json!({"query": {"term": {"SEX": 2}}}));
    }
}
