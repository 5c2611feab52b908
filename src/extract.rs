//! Figure block extraction
//!
//! A figure block is the reference line plus the directive and blank lines
//! that follow it. The scan is bounded by a lookahead window:
//!
//! ```text
//! ![[plot.png]]        <- start
//! :fw:0.6
//! caption: A plot      <- end
//!
//! Next paragraph       <- stops the scan
//! ```
//!
//! Boundary behaviour:
//! - A non-blank line without a directive marker ends the block before it.
//! - If the window runs out first, the whole window belongs to the figure,
//!   so a large window can swallow blank-separated directive-looking text.
//! - In both cases trailing blank lines are trimmed off the block.
//! - If the document ends inside the window, the block runs to the last line
//!   of the document and is not trimmed. `["![[a.png]]", "", ""]` is a
//!   three-line block, not one line. Compiled padding lines are blank, so
//!   the converted document comes out the same either way.

use crate::constants as C;
use crate::error::{Error, Result};
use crate::util::is_blank;

/// Check whether a line carries one of the figure directive markers
pub fn is_attribute_line(line: &str) -> bool {
    C::ATTRIBUTE_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Find the inclusive end index of the figure block starting at `start`
pub fn extract_block_end<S: AsRef<str>>(
    lines: &[S],
    start: usize,
    max_lookahead: usize,
) -> Result<usize> {
    if start >= lines.len() {
        return Err(Error::LineOutOfRange {
            line: start,
            len: lines.len(),
        });
    }

    let window_end = start.saturating_add(max_lookahead);
    let mut end = window_end;

    for index in start + 1..=window_end {
        // Document ends inside the window: keep everything up to the boundary
        if index >= lines.len() {
            log::debug!("figure at line {}: block runs to end of document", start + 1);
            return Ok(lines.len() - 1);
        }

        let line = lines[index].as_ref();
        if !is_blank(line) && !is_attribute_line(line) {
            end = index - 1;
            break;
        }
    }

    while end > start && is_blank(lines[end].as_ref()) {
        end -= 1;
    }

    log::debug!("figure block spans lines {}..={}", start + 1, end + 1);
    Ok(end)
}
