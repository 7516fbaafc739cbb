//! Full-screen interactive chart.
//!
//! [`show`] takes over the terminal, draws the chart until the user closes
//! it, and restores the terminal on exit or panic. While it is up,
//! [`is_active`] reports `true` so log writers can keep off the screen.

use crate::chart::BenchChart;
use crate::event::{to_viewer_event, ViewerEvent};
use crate::theme::Theme;
use crossterm::{
    event as ct_event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use esbench_core::BenchmarkReport;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

const HINT: &str = "q / Esc / Enter: close";

static ACTIVE: AtomicBool = AtomicBool::new(false);

/// True while the chart owns the terminal.
pub fn is_active() -> bool {
    ACTIVE.load(Ordering::Relaxed)
}

/// Marks the viewer active until dropped, including on unwind.
struct ActiveGuard;

impl ActiveGuard {
    fn enter() -> Self {
        ACTIVE.store(true, Ordering::Relaxed);
        Self
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.store(false, Ordering::Relaxed);
    }
}

/// Show the chart until a close key is pressed.
pub fn show(report: &BenchmarkReport, theme: &Theme) -> anyhow::Result<()> {
    install_panic_hook();
    tracing::debug!("opening chart viewer");

    enable_raw_mode()?;
    if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }

    let result = {
        let _quiet = ActiveGuard::enter();
        let result = Terminal::new(CrosstermBackend::new(io::stdout()))
            .map_err(anyhow::Error::from)
            .and_then(|mut terminal| {
                let result = event_loop(&mut terminal, report, theme);
                let _ = terminal.show_cursor();
                result
            });

        // Always restore the terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        result
    };
    tracing::debug!("chart viewer closed");

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    report: &BenchmarkReport,
    theme: &Theme,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| {
            frame.render_widget(BenchChart::new(report, theme).with_hint(HINT), frame.area());
        })?;

        if ct_event::poll(Duration::from_millis(250))? {
            match next_step(to_viewer_event(ct_event::read()?)) {
                Step::Exit => return Ok(()),
                Step::Repaint => terminal.clear()?,
                Step::Redraw => {}
            }
        }
    }
}

/// What the loop does after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Exit,
    /// Clear the screen before drawing; the old frame no longer lines up.
    Repaint,
    Redraw,
}

fn next_step(event: Option<ViewerEvent>) -> Step {
    match event {
        Some(ViewerEvent::Close) => Step::Exit,
        Some(ViewerEvent::Resize(..)) => Step::Repaint,
        None => Step::Redraw,
    }
}

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_exits_and_resize_repaints() {
        assert_eq!(next_step(Some(ViewerEvent::Close)), Step::Exit);
        assert_eq!(next_step(Some(ViewerEvent::Resize(80, 24))), Step::Repaint);
        assert_eq!(next_step(None), Step::Redraw);
    }

    #[test]
    fn active_only_while_guard_is_held() {
        assert!(!is_active());
        {
            let _quiet = ActiveGuard::enter();
            assert!(is_active());
        }
        assert!(!is_active());
    }
}
