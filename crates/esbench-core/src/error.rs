//! Error taxonomy for esbench.
//!
//! [`EngineError`] describes *why* a single request to the search engine
//! failed. [`BenchError`] wraps it with the pipeline stage that was running,
//! and is always fatal. [`RenderError`] is the only non-fatal error: the
//! reporter collects it and degrades to a text fallback.

use std::time::Duration;
use thiserror::Error;

/// Engine error type reported for an index that already exists.
pub const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Failure of a single request against the search engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No configured endpoint accepted a connection.
    #[error("no endpoint reachable ({attempted} tried): {reason}")]
    Unreachable { attempted: usize, reason: String },

    /// The request was sent but no response arrived in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Credentials were rejected.
    #[error("authentication rejected (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The engine answered with a non-success status.
    #[error("engine returned HTTP {status}: {reason}")]
    Rejected {
        status: u16,
        /// Engine-side error type, e.g. `resource_already_exists_exception`.
        kind: Option<String>,
        reason: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed engine response: {0}")]
    MalformedResponse(String),

    /// An endpoint from the configuration could not be used at all.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl EngineError {
    /// True when the engine refused an index creation because the index is
    /// already there.
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            EngineError::Rejected { kind: Some(kind), .. } if kind == ALREADY_EXISTS
        )
    }

    /// True when the failure happened before any server processed the request.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            EngineError::Unreachable { .. } | EngineError::Timeout(_) | EngineError::InvalidEndpoint { .. }
        )
    }

    /// True when the cluster cannot be used at all from this client: nothing
    /// answered, or the credentials were refused.
    pub fn is_connection_failure(&self) -> bool {
        self.is_transport() || matches!(self, EngineError::Unauthorized { .. })
    }
}

/// Pipeline stage a fatal error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Configuration,
    Connection,
    Provisioning,
    Running,
    Settings,
    Cancelled,
}

impl std::fmt::Display for FailedStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailedStage::Configuration => write!(f, "configuration"),
            FailedStage::Connection => write!(f, "connection"),
            FailedStage::Provisioning => write!(f, "provisioning"),
            FailedStage::Running => write!(f, "query execution"),
            FailedStage::Settings => write!(f, "settings read"),
            FailedStage::Cancelled => write!(f, "run"),
        }
    }
}

/// Fatal benchmark error. Every variant aborts the run; nothing is retried.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot reach search engine: {0}")]
    Connection(#[source] EngineError),

    #[error("creating index `{index}` failed: {source}")]
    Provisioning {
        index: String,
        #[source]
        source: EngineError,
    },

    #[error("query `{label}` failed: {source}")]
    QueryExecution {
        label: String,
        #[source]
        source: EngineError,
    },

    #[error("reading settings of index `{index}` failed: {source}")]
    Settings {
        index: String,
        #[source]
        source: EngineError,
    },

    #[error("cancelled before completion")]
    Cancelled,
}

impl BenchError {
    pub fn stage(&self) -> FailedStage {
        match self {
            BenchError::Config(_) => FailedStage::Configuration,
            BenchError::Connection(_) => FailedStage::Connection,
            BenchError::Provisioning { .. } => FailedStage::Provisioning,
            BenchError::QueryExecution { .. } => FailedStage::Running,
            BenchError::Settings { .. } => FailedStage::Settings,
            BenchError::Cancelled => FailedStage::Cancelled,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self.stage() {
            FailedStage::Configuration => 2,
            FailedStage::Connection => 3,
            FailedStage::Provisioning => 4,
            FailedStage::Running => 5,
            FailedStage::Settings => 6,
            FailedStage::Cancelled => 130,
        }
    }
}

/// A report sink failed. Never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{sink} output failed: {reason}")]
pub struct RenderError {
    pub sink: &'static str,
    pub reason: String,
}

impl RenderError {
    pub fn new(sink: &'static str, reason: impl std::fmt::Display) -> Self {
        Self { sink, reason: reason.to_string() }
    }
}

/// A query document could not be mapped back onto a predicate tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryParseError {
    #[error("expected a JSON object at `{path}`")]
    NotAnObject { path: String },

    #[error("expected exactly one clause at `{path}`, found {found}")]
    ClauseCount { path: String, found: usize },

    #[error("unsupported clause `{clause}` at `{path}`")]
    UnsupportedClause { path: String, clause: String },

    #[error("unsupported value at `{path}`: {value}")]
    UnsupportedValue { path: String, value: String },
}
