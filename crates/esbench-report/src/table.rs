//! Plain-text results table, the fallback when no chart can be shown.

use esbench_core::{BenchmarkReport, Replication};

const HEADER: [&str; 4] = ["query", "took (ms)", "hits", "shape"];

/// One row per result, in run order. Numbers are right-aligned; a missing
/// hit count prints as `-`.
pub fn render_table(report: &BenchmarkReport) -> String {
    let rows: Vec<[String; 4]> = report
        .results
        .iter()
        .map(|r| {
            [
                r.label.clone(),
                r.took_ms.to_string(),
                r.hits.map_or_else(|| "-".to_string(), |h| h.to_string()),
                r.shape.clone(),
            ]
        })
        .collect();

    let mut widths = HEADER.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| {
        format!(
            "{:<w0$}  {:>w1$}  {:>w2$}  {}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        )
        .trim_end()
        .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(HEADER));
    out.push('\n');
    let rule = widths.map(|w| "-".repeat(w));
    out.push_str(&line([&rule[0], &rule[1], &rule[2], &rule[3]]));
    out.push('\n');
    for row in &rows {
        out.push_str(&line([&row[0], &row[1], &row[2], &row[3]]));
        out.push('\n');
    }
    out
}

/// The two layout lines printed after every run. `None` means the settings
/// could not be read.
pub fn render_layout(effective: Option<Replication>) -> String {
    let (shards, replicas) = match effective {
        Some(layout) => (layout.shards.to_string(), layout.replicas.to_string()),
        None => ("unavailable".to_string(), "unavailable".to_string()),
    };
    format!("Number of shards: {shards}\nNumber of replicas: {replicas}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use esbench_core::QueryResult;

    fn result(label: &str, shape: &str, took_ms: u64, hits: Option<u64>) -> QueryResult {
        QueryResult { label: label.into(), shape: shape.into(), took_ms, hits, raw: None }
    }

    fn report() -> BenchmarkReport {
        BenchmarkReport {
            index: "covid_data_index".into(),
            declared: Replication { shards: 1, replicas: 0 },
            effective: None,
            results: vec![
                result("match_all", "*", 12, Some(1000)),
                result("range_open", "AGE≥60", 7, None),
                result("and[4,or[2]]", "AND(SEX=2, OR(CARDIOVASCULAR=1, OBESITY=1))", 143, Some(86)),
            ],
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn table_layout() {
        insta::assert_snapshot!(render_table(&report()), @r"
        query         took (ms)  hits  shape
        ------------  ---------  ----  -------------------------------------------
        match_all            12  1000  *
        range_open            7     -  AGE≥60
        and[4,or[2]]        143    86  AND(SEX=2, OR(CARDIOVASCULAR=1, OBESITY=1))
        ");
    }

    #[test]
    fn layout_lines_with_effective_settings() {
        let text = render_layout(Some(Replication { shards: 3, replicas: 1 }));
        assert_eq!(text, "Number of shards: 3\nNumber of replicas: 1\n");
    }

    #[test]
    fn layout_lines_when_settings_unreadable() {
        let text = render_layout(None);
        assert_eq!(text, "Number of shards: unavailable\nNumber of replicas: unavailable\n");
    }
}
