//! Static fixtures shared across harnesses.

use esbench_core::config::Config;
use esbench_core::IndexConfig;

/// Loopback port 1: connections are refused immediately.
pub const DEAD_ENDPOINT: &str = "http://127.0.0.1:1";

pub const INDEX: &str = "covid_data_index";

/// Labels of the canonical suite, in run order.
pub const CANONICAL_LABELS: [&str; 7] =
    ["match_all", "term", "range", "range_open", "and[3]", "and[4]", "and[4,or[2]]"];

/// `took` values scripted for one canonical run.
pub const CANONICAL_TOOK: [u64; 7] = [12, 4, 6, 5, 9, 11, 17];

/// The built-in index definition: 20 dataset columns, 1 shard, 0 replicas.
pub fn default_index() -> IndexConfig {
    Config::defaults().index_config().unwrap()
}
