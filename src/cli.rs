//! Command-line interface. Flags override the layered configuration.

use clap::{Args, Parser, Subcommand};
use esbench_core::config::{Config, DisplayMode};
use esbench_core::BenchError;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "esbench", version, about = "Query latency benchmark for Elasticsearch-compatible clusters")]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Provision the index, run the query suite and report the timings.
    Run(RunArgs),
    /// Print the query suite without contacting the cluster.
    Suite {
        /// Print labels, shapes and request bodies as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective shard and replica counts of the index.
    Settings(ConnectionArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Cluster endpoint; repeat to list failover endpoints in order.
    #[arg(long = "host", value_name = "URL")]
    pub hosts: Vec<String>,

    /// Target index name.
    #[arg(long)]
    pub index: Option<String>,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long, env = "ESBENCH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Accept invalid TLS certificates.
    #[arg(long)]
    pub insecure: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Shard count used when the index has to be created.
    #[arg(long)]
    pub shards: Option<u32>,

    /// Replica count used when the index has to be created.
    #[arg(long)]
    pub replicas: Option<u32>,

    /// Console output: auto, chart, table or none.
    #[arg(long, value_name = "MODE")]
    pub display: Option<DisplayMode>,

    /// Also write the chart to this file.
    #[arg(long, value_name = "PATH")]
    pub chart_file: Option<PathBuf>,

    /// Also write the full report as JSON to this file.
    #[arg(long = "json", value_name = "PATH")]
    pub json_file: Option<PathBuf>,

    /// Keep every raw search response in the JSON report.
    #[arg(long)]
    pub keep_raw: bool,

    /// Chart colour theme (default, mono).
    #[arg(long)]
    pub theme: Option<String>,
}

impl ConnectionArgs {
    /// Load the layered configuration and apply these flags on top.
    pub fn load(&self) -> Result<Config, BenchError> {
        let mut config = Config::load(self.config.as_deref())
            .map_err(|e| BenchError::Config(format!("{e:#}")))?;
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut Config) {
        if !self.hosts.is_empty() {
            config.connection.endpoints = self.hosts.clone();
        }
        if let Some(index) = &self.index {
            config.index.name = index.clone();
        }
        if let Some(user) = &self.user {
            config.connection.username = Some(user.clone());
        }
        if let Some(password) = &self.password {
            config.connection.password = Some(password.clone());
        }
        if self.insecure {
            config.connection.verify_tls = false;
        }
    }
}

impl RunArgs {
    pub fn load(&self) -> Result<Config, BenchError> {
        let mut config = self.connection.load()?;
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut Config) {
        self.connection.apply(config);
        if let Some(shards) = self.shards {
            config.index.shards = shards;
        }
        if let Some(replicas) = self.replicas {
            config.index.replicas = replicas;
        }
        if let Some(display) = self.display {
            config.report.display = display;
        }
        if let Some(path) = &self.chart_file {
            config.report.chart_file = Some(path.clone());
        }
        if let Some(path) = &self.json_file {
            config.report.json_file = Some(path.clone());
        }
        if self.keep_raw {
            config.report.keep_raw = true;
        }
        if let Some(theme) = &self.theme {
            config.report.theme = theme.clone();
        }
    }
}
