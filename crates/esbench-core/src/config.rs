//! Configuration types for esbench.
//!
//! [`Config::load`] layers, lowest priority first: the embedded defaults,
//! `$XDG_CONFIG_HOME/esbench/config.toml` (optional), an explicit config file
//! (required when given), then `ESBENCH_*` environment variables
//! (`ESBENCH_CONNECTION__PASSWORD`, `ESBENCH_INDEX__REPLICAS`, …). CLI flags
//! are applied on top by the binary. [`Config::defaults`] returns the embedded
//! defaults without touching the filesystem or environment.

use crate::error::BenchError;
use crate::types::{FieldMapping, IndexConfig, Replication};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[connection]
endpoints    = ["https://localhost:9200", "https://localhost:9201", "https://localhost:9202"]
username     = "elastic"
password     = "changeme"
verify_tls   = true
timeout_secs = 30

[index]
name     = "covid_data_index"
shards   = 1
replicas = 0

[[index.fields]]
name = "USMER"
type = "integer"
[[index.fields]]
name = "MEDICAL_UNIT"
type = "integer"
[[index.fields]]
name = "SEX"
type = "integer"
[[index.fields]]
name = "PATIENT_TYPE"
type = "integer"
[[index.fields]]
name = "DATE_DIED"
type = "date"
[[index.fields]]
name = "INTUBED"
type = "integer"
[[index.fields]]
name = "PNEUMONIA"
type = "integer"
[[index.fields]]
name = "AGE"
type = "integer"
[[index.fields]]
name = "PREGNANT"
type = "integer"
[[index.fields]]
name = "DIABETES"
type = "integer"
[[index.fields]]
name = "COPD"
type = "integer"
[[index.fields]]
name = "INMSUPR"
type = "integer"
[[index.fields]]
name = "HIPERTENSION"
type = "integer"
[[index.fields]]
name = "OTHER_DISEASE"
type = "integer"
[[index.fields]]
name = "CARDIOVASCULAR"
type = "integer"
[[index.fields]]
name = "OBESITY"
type = "integer"
[[index.fields]]
name = "RENAL_CHRONIC"
type = "integer"
[[index.fields]]
name = "TOBACCO"
type = "integer"
[[index.fields]]
name = "CLASIFFICATION_FINAL"
type = "integer"
[[index.fields]]
name = "ICU"
type = "integer"

[report]
display  = "auto"
theme    = "default"
keep_raw = false
"#;

const ENV_PREFIX: &str = "ESBENCH";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub index: IndexSection,
    pub report: ReportConfig,
}

/// `[connection]` section.
#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    /// One or more base URLs; later ones are used when earlier ones refuse
    /// connections.
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Certificate verification. Turning it off must be explicit.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_verify_tls() -> bool { true }
fn default_timeout_secs() -> u64 { 30 }

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("endpoints", &self.endpoints)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// `[index]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexSection {
    pub name: String,
    pub shards: u32,
    pub replicas: u32,
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
}

/// `[report]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub display: DisplayMode,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub keep_raw: bool,
    #[serde(default)]
    pub chart_file: Option<PathBuf>,
    #[serde(default)]
    pub json_file: Option<PathBuf>,
}

fn default_theme() -> String { "default".to_string() }

/// How results are shown on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Interactive chart on a terminal, table otherwise.
    #[default]
    Auto,
    Chart,
    Table,
    None,
}

impl std::str::FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(DisplayMode::Auto),
            "chart" => Ok(DisplayMode::Chart),
            "table" => Ok(DisplayMode::Table),
            "none" => Ok(DisplayMode::None),
            other => Err(format!("unknown display mode `{other}` (auto|chart|table|none)")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration. `explicit` must exist when given.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        Self::build(explicit, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn build(explicit: Option<&Path>, env: config::Environment) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(user_config_path()).required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("connection.endpoints")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// The validated target index.
    pub fn index_config(&self) -> Result<IndexConfig, BenchError> {
        IndexConfig::new(
            self.index.name.clone(),
            Replication { shards: self.index.shards, replicas: self.index.replicas },
            self.index.fields.clone(),
        )
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn user_config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("esbench")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
