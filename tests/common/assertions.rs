//! Domain-specific assertion macros for esbench harnesses.
//!
//! These add context-rich failure messages that make it clear which stage of
//! a run misbehaved.

// ---------------------------------------------------------------------------
// Error assertions
// ---------------------------------------------------------------------------

/// Assert that a `Result` failed with an error matching the pattern.
///
/// ```rust
/// assert_bench_error!(result, BenchError::Connection(_));
/// assert_bench_error!(result, BenchError::QueryExecution { label, .. } if label == "range");
/// ```
#[macro_export]
macro_rules! assert_bench_error {
    ($result:expr, $pattern:pat $(if $guard:expr)?) => {{
        match $result {
            Err($pattern) $(if $guard)? => {}
            Err(other) => panic!(
                "assert_bench_error! failed:\n  expected: {}\n  actual:   {:?}",
                stringify!($pattern),
                other
            ),
            Ok(_) => panic!("assert_bench_error! failed: expected {}, got Ok", stringify!($pattern)),
        }
    }};
}

// ---------------------------------------------------------------------------
// Report assertions
// ---------------------------------------------------------------------------

/// Assert that a report's results carry exactly these labels, in order.
#[macro_export]
macro_rules! assert_labels {
    ($report:expr, $expected:expr) => {{
        let report: &esbench_core::BenchmarkReport = &$report;
        let actual: Vec<&str> = report.results.iter().map(|r| r.label.as_str()).collect();
        let expected: Vec<&str> = $expected.iter().map(|s| &**s).collect();
        if actual != expected {
            panic!(
                "assert_labels! failed:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            );
        }
    }};
}

/// Assert the sequence of stages a session went through.
#[macro_export]
macro_rules! assert_history {
    ($session:expr, [$($stage:expr),* $(,)?]) => {{
        let expected: Vec<esbench::Stage> = vec![$($stage),*];
        let actual = $session.history().to_vec();
        if actual != expected {
            panic!(
                "assert_history! failed:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            );
        }
    }};
}
