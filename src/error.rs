//! Error types for emx-figure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::reference::ReferenceStyle;

/// Result type alias for emx-figure operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting figures.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading, writing or copying files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No file matched when resolving a figure.
    #[error("no file matching '{pattern}' under {}", root.display())]
    NoMatch { pattern: String, root: PathBuf },

    /// More than one file matched when resolving a wikilink figure.
    #[error(
        "'{pattern}' is ambiguous, {} files match: {}",
        candidates.len(),
        join_paths(candidates)
    )]
    AmbiguousMatch {
        pattern: String,
        candidates: Vec<PathBuf>,
    },

    /// The first line of a figure block is not an image reference.
    #[error("not a {style} image reference: {line:?}")]
    MalformedReference { style: ReferenceStyle, line: String },

    /// The copy pipeline has no figure folder to build relative paths from.
    #[error("no destination figure folder configured")]
    MissingDestination,

    /// A glob pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A line index points past the end of the document.
    #[error("line {line} is out of range (document has {len} lines)")]
    LineOutOfRange { line: usize, len: usize },

    /// A block replacement would change the document length.
    #[error("replacement at line {start} has {actual} lines, expected {expected}")]
    BlockLength {
        start: usize,
        expected: usize,
        actual: usize,
    },

    /// Config file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// A single figure failed; `line` is the 0-based index of its reference line.
    #[error("figure at line {}: {source}", line + 1)]
    Figure {
        line: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the figure's line index to an error.
    pub fn at_line(self, line: usize) -> Self {
        Error::Figure {
            line,
            source: Box::new(self),
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| crate::util::display_path(p))
        .collect::<Vec<_>>()
        .join(", ")
}
