//! esbench-engine: Elasticsearch REST adapter for esbench.
//!
//! [`HttpEngine`] implements [`esbench_core::SearchEngine`] over HTTP(S)
//! with basic auth. Requests go to one endpoint at a time; when an endpoint
//! refuses the connection the next configured one is tried.

pub mod elastic;
mod response;
mod transport;

pub use elastic::{create_index_body, HttpEngine};
