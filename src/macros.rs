//! Output macro table and rendering

use serde::{Deserialize, Serialize};

/// How a macro call is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MacroSyntax {
    /// `\name{a}{b}`
    #[default]
    Latex,
    /// `name(a, b)`
    Call,
}

/// Names of the emitted macros
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroTable {
    /// Width-governed figure: `(width, path)`
    pub standard: String,
    /// Height-governed figure: `(height, path)`
    pub vertical: String,
    /// Captioned figure: `(width, path, caption)`
    pub captioned: String,
    /// Label command appended to captions, always written `\name{label}`
    /// since it lands inside the caption text
    pub label_ref: String,
    /// Call syntax
    pub syntax: MacroSyntax,
}

impl Default for MacroTable {
    fn default() -> Self {
        Self {
            standard: "myfig".to_string(),
            vertical: "myvfig".to_string(),
            captioned: "mycaptionfig".to_string(),
            label_ref: "label".to_string(),
            syntax: MacroSyntax::Latex,
        }
    }
}

impl MacroTable {
    /// Placeholder names in call syntax, handy for reading output shapes
    pub fn call_style() -> Self {
        Self {
            standard: "STANDARD_FIGURE".to_string(),
            vertical: "VERTICAL_FIGURE".to_string(),
            captioned: "CAPTIONED_FIGURE".to_string(),
            label_ref: "label".to_string(),
            syntax: MacroSyntax::Call,
        }
    }

    /// Render one figure macro call
    pub fn render(&self, figure: &FigureMacro) -> String {
        match figure {
            FigureMacro::Captioned { width, path, caption } => {
                self.call(&self.captioned, &[width.as_str(), path.as_str(), caption.as_str()])
            }
            FigureMacro::Vertical { height, path } => {
                self.call(&self.vertical, &[height.as_str(), path.as_str()])
            }
            FigureMacro::Standard { width, path } => {
                self.call(&self.standard, &[width.as_str(), path.as_str()])
            }
        }
    }

    /// Append a label reference to a caption
    pub fn fold_label(&self, caption: &str, label: &str) -> String {
        format!("{} \\{}{{{}}}", caption, self.label_ref, label)
    }

    fn call(&self, name: &str, args: &[&str]) -> String {
        match self.syntax {
            MacroSyntax::Latex => {
                let mut out = format!("\\{}", name);
                for arg in args {
                    out.push('{');
                    out.push_str(arg);
                    out.push('}');
                }
                out
            }
            MacroSyntax::Call => format!("{}({})", name, args.join(", ")),
        }
    }
}

/// The macro chosen for one figure, with its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FigureMacro {
    /// Caption present
    Captioned {
        width: String,
        path: String,
        caption: String,
    },
    /// Height governs, no caption
    Vertical { height: String, path: String },
    /// Width governs (or nothing given), no caption
    Standard { width: String, path: String },
}
