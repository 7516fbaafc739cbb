//! Key handling for the interactive chart viewer.
//!
//! Crossterm events are mapped to a small [`ViewerEvent`] vocabulary so the
//! viewer loop never matches on crossterm types directly.
//!
//! | Key(s)                       | Event          |
//! |------------------------------|----------------|
//! | `q`, `Esc`, `Enter`, `Ctrl+c`| `Close`        |
//! | terminal resize              | `Resize(w, h)` |

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// Leave the viewer and continue with the rest of the report.
    Close,
    /// The terminal was resized to the given (width, height).
    Resize(u16, u16),
}

/// Map a raw crossterm [`Event`] to a [`ViewerEvent`].
///
/// Returns `None` for mouse events, key releases and unbound keys.
pub fn to_viewer_event(event: Event) -> Option<ViewerEvent> {
    match event {
        Event::Resize(w, h) => Some(ViewerEvent::Resize(w, h)),
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<ViewerEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('q') if key.modifiers == Mod::NONE => Some(ViewerEvent::Close),
        // Raw mode swallows SIGINT, so Ctrl+c arrives as a key.
        Char('c') if key.modifiers == Mod::CONTROL => Some(ViewerEvent::Close),
        Esc | Enter => Some(ViewerEvent::Close),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
