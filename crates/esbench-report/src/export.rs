//! File sinks: the JSON report and the text-canvas chart.

use crate::chart::{self, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::theme::Theme;
use anyhow::Context;
use esbench_core::BenchmarkReport;
use std::path::Path;

/// Write the full report as pretty-printed JSON.
pub fn write_json(report: &BenchmarkReport, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialising report")?;
    std::fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// Write the bar chart rendered onto a fixed-size text canvas.
pub fn write_chart(report: &BenchmarkReport, theme: &Theme, path: &Path) -> anyhow::Result<()> {
    let text = chart::render_to_text(report, theme, CANVAS_WIDTH, CANVAS_HEIGHT);
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "chart written");
    Ok(())
}
