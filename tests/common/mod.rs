//! Shared test utilities for esbench integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

pub mod assertions;
pub mod builders;
pub mod fake_engine_api;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fake_engine_api::FakeEngineApi;
pub use fixtures::*;
