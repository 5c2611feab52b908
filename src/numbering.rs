//! Next free numbered folder
//!
//! Lecture or chapter folders are named from a template such as
//! `class_{}_*`, where `{}` becomes a zero-padded two-digit number.

use std::path::Path;

use glob::{glob_with, MatchOptions, Pattern};

use crate::constants as C;
use crate::error::{Error, Result};

/// Fill the `{}` placeholder of `template` with `number`
pub fn folder_pattern(template: &str, number: u32) -> String {
    template.replacen("{}", &format!("{:02}", number), 1)
}

/// First number in `1..200` whose filled template matches nothing under `root`
///
/// Returns `None` when every number is taken.
pub fn next_folder_number(root: &Path, template: &str) -> Result<Option<u32>> {
    if !template.contains('*') {
        log::warn!("no '*' in folder template '{}', only exact names match", template);
    }

    let options = MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    };
    let root = Pattern::escape(&root.to_string_lossy());

    for number in 1..C::MAX_FOLDER_NUMBER {
        let pattern = format!("{}/{}", root, folder_pattern(template, number));
        let mut matches = glob_with(&pattern, options).map_err(|e| Error::InvalidPattern {
            pattern: pattern.clone(),
            message: e.msg.to_string(),
        })?;

        if matches.next().is_none() {
            log::debug!("'{}' is free", pattern);
            return Ok(Some(number));
        }
    }

    Ok(None)
}
