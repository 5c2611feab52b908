//! Utility functions for path handling

use std::path::Path;

use crate::constants as C;

/// Display a path with forward slashes (cross-platform standard)
/// Converts Windows backslashes to forward slashes for consistent output
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Check whether a link target points somewhere off disk
pub fn is_remote_url(target: &str) -> bool {
    let target = target.trim();
    target.contains("://") || target.starts_with("www.") || target.starts_with("data:")
}

/// Check whether a path has one of the figure extensions (case-insensitive)
pub fn has_figure_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            C::FIGURE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Check whether a path already has the PDF extension
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(C::PDF_EXTENSION))
        .unwrap_or(false)
}

/// Decode the `%20` escapes that inline links use for spaces
pub fn decode_link_target(target: &str) -> String {
    target.trim().replace("%20", " ")
}

/// Lines that contain only whitespace count as blank
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
