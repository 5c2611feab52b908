//! Image reference parsing
//!
//! Two embed syntaxes open a figure:
//! - Wikilink: `![[diagram.png]]` (optionally `![[diagram.png|300]]`),
//!   resolved by searching the image root for a unique file name
//! - Inline: `![alt](attachments/diagram.png)`, resolved relative to the
//!   vault root and accepted only if the file exists on disk

use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::store::FileStore;
use crate::util;

static WIKI_EMBED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[\[([^\]|]+)(?:\|[^\]]*)?\]\]").unwrap());

static INLINE_EMBED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// Embed syntax of a figure reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceStyle {
    /// `![[path]]`
    Wiki,
    /// `![alt](path)`
    Inline,
}

impl ReferenceStyle {
    /// Regex extracting the target from a line of this style
    pub fn pattern(self) -> &'static Regex {
        match self {
            ReferenceStyle::Wiki => &*WIKI_EMBED,
            ReferenceStyle::Inline => &*INLINE_EMBED,
        }
    }

    /// Parse the first reference of this style on a line
    pub fn parse(self, line: &str) -> Option<FigureReference> {
        let caps = self.pattern().captures(line)?;
        match self {
            ReferenceStyle::Wiki => Some(FigureReference {
                style: self,
                target: caps[1].trim().to_string(),
                alt: None,
            }),
            ReferenceStyle::Inline => {
                let target = strip_link_title(&caps[2]);
                if target.is_empty() {
                    return None;
                }
                Some(FigureReference {
                    style: self,
                    target,
                    alt: Some(caps[1].to_string()),
                })
            }
        }
    }

    /// Parse a line as either style, wikilinks first
    pub fn detect(line: &str) -> Option<FigureReference> {
        ReferenceStyle::Wiki
            .parse(line)
            .or_else(|| ReferenceStyle::Inline.parse(line))
    }
}

impl fmt::Display for ReferenceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceStyle::Wiki => write!(f, "wikilink"),
            ReferenceStyle::Inline => write!(f, "inline"),
        }
    }
}

/// An embedded image reference
#[derive(Debug, Clone, PartialEq)]
pub struct FigureReference {
    /// Syntax the reference was written in
    pub style: ReferenceStyle,
    /// Raw target path as written
    pub target: String,
    /// Alt text (inline references only)
    pub alt: Option<String>,
}

impl FigureReference {
    /// Glob used to find a wikilink target under the image root
    pub fn search_pattern(&self) -> String {
        format!("**/{}", glob::Pattern::escape(&self.target))
    }

    /// Whether this reference embeds a figure at all
    ///
    /// Wikilinks need a figure extension (so `![[Other note]]` is skipped).
    /// Inline links must also be local and exist under the vault root.
    pub fn is_figure<S: FileStore + ?Sized>(&self, store: &S, vault_root: &Path) -> bool {
        if !util::has_figure_extension(&self.target) {
            return false;
        }
        match self.style {
            ReferenceStyle::Wiki => true,
            ReferenceStyle::Inline => {
                !util::is_remote_url(&self.target)
                    && store.path_exists(&vault_root.join(util::decode_link_target(&self.target)))
            }
        }
    }

    /// Resolve the reference to a file on disk
    pub fn locate<S: FileStore + ?Sized>(
        &self,
        store: &S,
        vault_root: &Path,
        image_root: &Path,
    ) -> Result<PathBuf> {
        match self.style {
            ReferenceStyle::Wiki => store.unique_file_under(image_root, &self.search_pattern()),
            ReferenceStyle::Inline => {
                let path = vault_root.join(util::decode_link_target(&self.target));
                if store.path_exists(&path) {
                    Ok(path)
                } else {
                    Err(Error::NoMatch {
                        pattern: self.target.clone(),
                        root: vault_root.to_path_buf(),
                    })
                }
            }
        }
    }
}

/// Find every line that opens a figure, in ascending order
pub fn find_figures<S: FileStore + ?Sized>(
    lines: &[String],
    store: &S,
    vault_root: &Path,
) -> Vec<(usize, FigureReference)> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let reference = ReferenceStyle::detect(line)?;
            if reference.is_figure(store, vault_root) {
                Some((index, reference))
            } else {
                log::debug!("line {}: skipping non-figure embed {:?}", index + 1, reference.target);
                None
            }
        })
        .collect()
}

/// Drop `<...>` wrapping and a trailing `"title"` from an inline link target
fn strip_link_title(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('<') {
        if let Some(end) = inner.find('>') {
            return inner[..end].trim().to_string();
        }
    }
    match raw.find(" \"") {
        Some(pos) => raw[..pos].trim().to_string(),
        None => raw.to_string(),
    }
}
