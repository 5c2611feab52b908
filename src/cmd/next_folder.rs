//! Next-folder command

use std::io;
use std::path::Path;

use emx_figure::constants::MAX_FOLDER_NUMBER;
use emx_figure::numbering::{folder_pattern, next_folder_number};
use emx_figure::Result;

pub fn run(root: Option<&Path>, pattern: &str) -> Result<()> {
    let root = root.unwrap_or(Path::new("."));

    match next_folder_number(root, pattern)? {
        Some(number) => {
            println!("{}", number);
            eprintln!("Next folder: {}", folder_pattern(pattern, number));
            Ok(())
        }
        None => Err(io::Error::other(format!(
            "every number below {} is taken for '{}'",
            MAX_FOLDER_NUMBER, pattern
        ))
        .into()),
    }
}
