//! Colour themes for the benchmark chart.
//!
//! Themes are TOML files embedded in the binary with [`include_str!`]. Two
//! ship with esbench: `default` and `mono`. Pick one with [`Theme::named`].

use anyhow::bail;
use config::{Config, File, FileFormat};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const MONO_THEME_SRC: &str = include_str!("themes/mono.toml");

/// Names accepted by [`Theme::named`].
pub const THEME_NAMES: &[&str] = &["default", "mono"];

// ---------------------------------------------------------------------------
// Raw (serde) types: mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawChart {
    title: RawStyle,
    border: RawStyle,
    axis: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBars {
    bar: RawStyle,
    value: RawStyle,
    label: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLegend {
    label: RawStyle,
    shape: RawStyle,
    hint: RawStyle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTheme {
    chart: RawChart,
    bars: RawBars,
    legend: RawLegend,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Resolved chart styles.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub title: Style,
    pub border: Style,
    /// Axis caption ("Time (milliseconds)").
    pub axis: Style,
    pub bar: Style,
    /// Duration printed inside each bar.
    pub bar_value: Style,
    /// Query label under each bar.
    pub bar_label: Style,
    pub legend_label: Style,
    pub legend_shape: Style,
    /// Key hint line in the interactive viewer.
    pub hint: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::load_default()
    }
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Look up an embedded theme by name.
    pub fn named(name: &str) -> anyhow::Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::load_default()),
            "mono" => Self::from_toml_str(MONO_THEME_SRC),
            other => bail!("unknown theme `{other}` (available: {})", THEME_NAMES.join(", ")),
        }
    }

    /// Parse a theme from a TOML string. Missing sections and keys fall back
    /// to the terminal's default style.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            title: raw.chart.title.into_style(),
            border: raw.chart.border.into_style(),
            axis: raw.chart.axis.into_style(),
            bar: raw.bars.bar.into_style(),
            bar_value: raw.bars.value.into_style(),
            bar_label: raw.bars.label.into_style(),
            legend_label: raw.legend.label.into_style(),
            legend_shape: raw.legend.shape.into_style(),
            hint: raw.legend.hint.into_style(),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a colour name into a ratatui [`Color`].
///
/// Accepts named terminal colours (`red`, `dark_gray`, …), hex RGB
/// (`#rrggbb`) and 256-colour indexes (`indexed:N`).
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::Indexed(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
