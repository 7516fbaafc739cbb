//! One benchmark run as an explicit state machine.
//!
//! ```text
//! Idle ──► Provisioning ──► Running(i/N) ──► Reporting ──► Done
//!               │                │
//!               └──► Failed ◄────┘
//! ```
//!
//! Every transition is logged. A session runs once; no stage is revisited.

use esbench_core::provision::{self, Provisioned};
use esbench_core::runner::{self, RunOptions};
use esbench_core::{
    BenchError, BenchmarkReport, FailedStage, IndexConfig, QuerySuite, RenderError, SearchEngine,
};
use esbench_report::Reporter;
use std::fmt;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Provisioning,
    Running { done: usize, total: usize },
    Reporting,
    Done,
    Failed(FailedStage),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => write!(f, "idle"),
            Stage::Provisioning => write!(f, "provisioning"),
            Stage::Running { done, total } => write!(f, "running {done}/{total}"),
            Stage::Reporting => write!(f, "reporting"),
            Stage::Done => write!(f, "done"),
            Stage::Failed(stage) => write!(f, "failed ({stage})"),
        }
    }
}

/// A single benchmark run. Owns the engine handle; dropping the session
/// releases the connection whatever stage it stopped in.
pub struct Session<E: SearchEngine> {
    engine: E,
    index: IndexConfig,
    suite: QuerySuite,
    options: RunOptions,
    stage: Stage,
    /// Stages entered so far, progress updates within `Running` excluded.
    history: Vec<Stage>,
}

impl<E: SearchEngine> Session<E> {
    pub fn new(engine: E, index: IndexConfig, suite: QuerySuite, options: RunOptions) -> Self {
        Self { engine, index, suite, options, stage: Stage::Idle, history: vec![Stage::Idle] }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Provision the index, run the suite and read back the effective index
    /// layout. Leaves the session in `Reporting` on success.
    pub async fn benchmark(&mut self) -> Result<BenchmarkReport, BenchError> {
        if self.stage != Stage::Idle {
            return Err(BenchError::Config(format!("session already {}", self.stage)));
        }

        match self.execute().await {
            Ok(report) => Ok(report),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Hand the report to `reporter`. Render failures are returned, never
    /// fatal.
    pub fn finish<W: Write>(
        &mut self,
        reporter: &mut Reporter<W>,
        report: &BenchmarkReport,
    ) -> Vec<RenderError> {
        let errors = reporter.report(report);
        self.enter(Stage::Done);
        errors
    }

    /// Record a failure raised outside the session, e.g. cancellation.
    pub fn fail(&mut self, err: &BenchError) {
        if !matches!(self.stage, Stage::Failed(_)) {
            tracing::error!(stage = %self.stage, error = %err, "run failed");
            self.enter(Stage::Failed(err.stage()));
        }
    }

    async fn execute(&mut self) -> Result<BenchmarkReport, BenchError> {
        self.enter(Stage::Provisioning);
        match provision::ensure_index(&self.engine, &self.index).await? {
            Provisioned::Created => tracing::info!(index = %self.index.name, "provisioned"),
            Provisioned::AlreadyPresent => tracing::info!(index = %self.index.name, "reusing index"),
        }

        let total = self.suite.len();
        self.enter(Stage::Running { done: 0, total });
        let stage = &mut self.stage;
        let mut report = runner::run_observed(
            &self.engine,
            &self.index,
            &self.suite,
            self.options,
            |done, _| *stage = Stage::Running { done, total },
        )
        .await?;

        self.enter(Stage::Reporting);
        match self.engine.index_settings(&self.index.name).await {
            Ok(layout) => report.effective = Some(layout),
            Err(err) => tracing::warn!(index = %self.index.name, error = %err, "could not read index settings"),
        }
        Ok(report)
    }

    fn enter(&mut self, next: Stage) {
        tracing::info!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
        self.history.push(next);
    }
}
