//! Constants for emx-figure
//!
//! This module contains the directive markers, defaults, file names and
//! environment variable names used throughout the codebase.

// === Figure Directives ===

/// Width directive marker: `:fw:0.5`
pub const WIDTH_MARKER: &str = ":fw:";

/// Height directive marker: `:fh:0.6`
pub const HEIGHT_MARKER: &str = ":fh:";

/// Caption directive marker: `caption: Some text`
pub const CAPTION_MARKER: &str = "caption:";

/// Label directive marker: `label: fig:name`
pub const LABEL_MARKER: &str = "label:";

/// All recognized directive markers (used by the block extractor)
pub const ATTRIBUTE_MARKERS: [&str; 4] =
    [WIDTH_MARKER, HEIGHT_MARKER, CAPTION_MARKER, LABEL_MARKER];

// === Defaults ===

/// Number of lines after a figure reference scanned for directives
pub const DEFAULT_LOOKAHEAD: usize = 5;

/// Unit appended to `:fw:` values
pub const DEFAULT_WIDTH_UNIT: &str = "\\textwidth";

/// Unit appended to `:fh:` values
pub const DEFAULT_HEIGHT_UNIT: &str = "\\textheight";

/// Width used when a figure gives none
pub const DEFAULT_WIDTH: &str = "0.9\\textwidth";

/// Height used when a figure gives none
pub const DEFAULT_HEIGHT: &str = "0.8\\textheight";

/// Folder (relative to the output document) that copied figures land in
pub const DEFAULT_FIG_FOLDER: &str = "figs";

/// Default template for numbered folders; `{}` is replaced by a 2-digit number
pub const DEFAULT_FOLDER_TEMPLATE: &str = "class_{}_*";

/// Upper bound (exclusive) when searching for the next folder number
pub const MAX_FOLDER_NUMBER: u32 = 200;

// === Files ===

/// Extensions (lowercase, without dot) treated as figures
pub const FIGURE_EXTENSIONS: [&str; 11] = [
    "png", "jpg", "jpeg", "gif", "svg", "pdf", "bmp", "tif", "tiff", "eps", "webp",
];

/// Extension preferred for typeset output when a sibling exists
pub const PDF_EXTENSION: &str = "pdf";

/// Per-vault config file name
pub const VAULT_CONFIG_FILENAME: &str = ".emx-figure.yaml";

/// Directory under the user config dir holding the global config
pub const CONFIG_DIR_NAME: &str = "emx-figure";

/// Global config file name
pub const CONFIG_FILENAME: &str = "config.yaml";

// === Environment ===

/// Vault root override
pub const ENV_VAULT: &str = "EMX_FIGURE_VAULT";

/// Image root override
pub const ENV_IMAGE_ROOT: &str = "EMX_FIGURE_IMAGE_ROOT";

/// Config file override
pub const ENV_CONFIG: &str = "EMX_FIGURE_CONFIG";
