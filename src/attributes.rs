//! Figure directive parsing
//!
//! Directives follow the reference line, one per line:
//! `:fw:0.5`, `:fh:0.7`, `caption: Some text`, `label: fig:name`.
//! For each key the first line containing its marker wins.
//!
//! A bare `:fw:` or `:fh:` asks for that dimension at its default size.
//! An empty caption or label counts as absent.

use crate::constants as C;

/// Units and default sizes for width and height directives
#[derive(Debug, Clone, Copy)]
pub struct Dimensions<'a> {
    /// Appended to `:fw:` values
    pub width_unit: &'a str,
    /// Appended to `:fh:` values
    pub height_unit: &'a str,
    /// Used for a bare `:fw:`
    pub default_width: &'a str,
    /// Used for a bare `:fh:`
    pub default_height: &'a str,
}

impl Default for Dimensions<'static> {
    fn default() -> Self {
        Self {
            width_unit: C::DEFAULT_WIDTH_UNIT,
            height_unit: C::DEFAULT_HEIGHT_UNIT,
            default_width: C::DEFAULT_WIDTH,
            default_height: C::DEFAULT_HEIGHT,
        }
    }
}

/// Attributes parsed from a figure block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FigureAttributes {
    /// Width with unit, e.g. `0.5\textwidth`
    pub width: Option<String>,
    /// Height with unit, e.g. `0.7\textheight`
    pub height: Option<String>,
    /// Caption text, verbatim
    pub caption: Option<String>,
    /// Label, verbatim
    pub label: Option<String>,
}

impl FigureAttributes {
    /// Parse directive lines (the lines after the reference line)
    pub fn parse<S: AsRef<str>>(lines: &[S], dims: Dimensions<'_>) -> Self {
        let width = find_directive(lines, C::WIDTH_MARKER)
            .map(|v| dimension(v, dims.width_unit, dims.default_width));
        let height = find_directive(lines, C::HEIGHT_MARKER)
            .map(|v| dimension(v, dims.height_unit, dims.default_height));

        Self {
            width,
            height,
            caption: find_directive(lines, C::CAPTION_MARKER).filter(|v| !v.is_empty()),
            label: find_directive(lines, C::LABEL_MARKER).filter(|v| !v.is_empty()),
        }
    }

    /// Whether no directive was given at all
    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.caption.is_none()
            && self.label.is_none()
    }
}

fn dimension(value: String, unit: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        format!("{}{}", value, unit)
    }
}

/// Trimmed value after the first line containing `marker`
fn find_directive<S: AsRef<str>>(lines: &[S], marker: &str) -> Option<String> {
    let line = lines
        .iter()
        .map(|l| l.as_ref())
        .find(|line| line.contains(marker))?;
    let start = line.find(marker)? + marker.len();
    Some(line[start..].trim().to_string())
}
