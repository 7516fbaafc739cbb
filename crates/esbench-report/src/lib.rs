//! esbench-report: result reporting for esbench.
//!
//! [`Reporter::report`] sends a finished [`BenchmarkReport`] to every
//! configured sink: the console (interactive bar chart or text table), an
//! optional chart file and an optional JSON file. Sink failures never abort;
//! they come back as [`RenderError`]s and the console degrades to the table.
//! The effective shard and replica counts are printed last, always.

pub mod chart;
pub mod event;
pub mod export;
pub mod table;
pub mod theme;
pub mod viewer;

pub use theme::Theme;

use esbench_core::config::{DisplayMode, ReportConfig};
use esbench_core::{BenchmarkReport, RenderError};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

/// Where a report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub display: DisplayMode,
    pub chart_file: Option<PathBuf>,
    pub json_file: Option<PathBuf>,
    /// Whether the console is a terminal the chart viewer can take over.
    pub interactive: bool,
}

impl ReportOptions {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            display: config.display,
            chart_file: config.chart_file.clone(),
            json_file: config.json_file.clone(),
            interactive: io::stdout().is_terminal(),
        }
    }
}

pub struct Reporter<W: Write> {
    options: ReportOptions,
    theme: Theme,
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout(options: ReportOptions, theme: Theme) -> Self {
        Self::new(options, theme, io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(options: ReportOptions, theme: Theme, out: W) -> Self {
        Self { options, theme, out }
    }

    /// Render `report` to every configured sink and return what failed.
    pub fn report(&mut self, report: &BenchmarkReport) -> Vec<RenderError> {
        let mut errors = Vec::new();

        if report.layout_drift() {
            if let Some(effective) = report.effective {
                tracing::warn!(
                    index = %report.index,
                    declared_shards = report.declared.shards,
                    declared_replicas = report.declared.replicas,
                    effective_shards = effective.shards,
                    effective_replicas = effective.replicas,
                    "index layout differs from configuration; existing indices are never modified"
                );
            }
        }

        self.console(report, &mut errors);

        if let Some(path) = &self.options.chart_file {
            if let Err(e) = export::write_chart(report, &self.theme, path) {
                errors.push(RenderError::new("chart file", format!("{e:#}")));
            }
        }
        if let Some(path) = &self.options.json_file {
            if let Err(e) = export::write_json(report, path) {
                errors.push(RenderError::new("json", format!("{e:#}")));
            }
        }

        if let Err(e) = self.write(&table::render_layout(report.effective)) {
            errors.push(RenderError::new("layout", e));
        }

        for err in &errors {
            tracing::warn!(sink = err.sink, reason = %err.reason, "report output failed");
        }
        errors
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn console(&mut self, report: &BenchmarkReport, errors: &mut Vec<RenderError>) {
        let chart = match self.options.display {
            DisplayMode::None => return,
            DisplayMode::Table => false,
            DisplayMode::Auto => self.options.interactive,
            DisplayMode::Chart if !self.options.interactive => {
                errors.push(RenderError::new("terminal chart", "stdout is not a terminal"));
                false
            }
            DisplayMode::Chart => true,
        };

        if chart {
            match viewer::show(report, &self.theme) {
                Ok(()) => return,
                Err(e) => errors.push(RenderError::new("terminal chart", format!("{e:#}"))),
            }
        }

        if let Err(e) = self.write(&table::render_table(report)) {
            errors.push(RenderError::new("table", e));
        }
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}
