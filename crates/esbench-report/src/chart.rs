//! Bar chart of per-query durations.
//!
//! One bar per query, left to right in run order, height proportional to the
//! engine-reported `took`. A legend under the bars repeats each label with
//! its duration and full predicate shape, since bar labels are truncated to
//! the bar width.

use crate::theme::Theme;
use esbench_core::BenchmarkReport;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Widget},
};

pub const TITLE: &str = "Elasticsearch Benchmark";
pub const Y_AXIS_LABEL: &str = "Time (milliseconds)";

/// Canvas size used when the chart is written to a file.
pub const CANVAS_WIDTH: u16 = 100;
pub const CANVAS_HEIGHT: u16 = 32;

const BAR_GAP: u16 = 1;
const MAX_BAR_WIDTH: u16 = 16;

pub struct BenchChart<'a> {
    report: &'a BenchmarkReport,
    theme: &'a Theme,
    hint: Option<&'a str>,
}

impl<'a> BenchChart<'a> {
    pub fn new(report: &'a BenchmarkReport, theme: &'a Theme) -> Self {
        Self { report, theme, hint: None }
    }

    /// Show a key hint on the last line.
    pub fn with_hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }

    fn legend(&self) -> Vec<Line<'a>> {
        let width = self.report.results.iter().map(|r| r.label.len()).max().unwrap_or(0);
        let mut lines: Vec<Line> = self
            .report
            .results
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(format!("{:<width$}", r.label), self.theme.legend_label),
                    Span::raw(format!("  {:>7} ms  ", r.took_ms)),
                    Span::styled(r.shape.as_str(), self.theme.legend_shape),
                ])
            })
            .collect();
        if let Some(hint) = self.hint {
            lines.push(Line::styled(hint, self.theme.hint));
        }
        lines
    }
}

impl Widget for BenchChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title(Line::styled(format!(" {TITLE} "), self.theme.title).centered());
        let inner = block.inner(area);
        block.render(area, buf);

        let legend = self.legend();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(saturating_u16(legend.len())),
            ])
            .split(inner);

        Paragraph::new(Line::styled(Y_AXIS_LABEL, self.theme.axis)).render(rows[0], buf);

        let results = &self.report.results;
        if results.is_empty() {
            Paragraph::new("no results").render(rows[1], buf);
            return;
        }

        let count = saturating_u16(results.len());
        let bar_width = (rows[1].width.saturating_sub(BAR_GAP.saturating_mul(count - 1)) / count)
            .clamp(1, MAX_BAR_WIDTH);
        let max = results.iter().map(|r| r.took_ms).max().unwrap_or(0).max(1);

        let bars: Vec<Bar> = results
            .iter()
            .map(|r| {
                Bar::default()
                    .value(r.took_ms)
                    .label(Line::from(r.label.clone()))
                    .text_value(r.took_ms.to_string())
            })
            .collect();

        BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(BAR_GAP)
            .max(max)
            .bar_style(self.theme.bar)
            .value_style(self.theme.bar_value)
            .label_style(self.theme.bar_label)
            .render(rows[1], buf);

        Paragraph::new(legend).render(rows[2], buf);
    }
}

fn saturating_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Render the chart onto a `width` × `height` text canvas, one line per row
/// with trailing blanks removed.
pub fn render_to_text(report: &BenchmarkReport, theme: &Theme, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    BenchChart::new(report, theme).render(area, &mut buf);

    let mut out = String::with_capacity(usize::from(width + 1) * usize::from(height));
    for y in 0..height {
        let mut line = String::with_capacity(usize::from(width));
        for x in 0..width {
            line.push_str(buf[(x, y)].symbol());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
