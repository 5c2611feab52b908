//! Whole-note conversion
//!
//! Finds every figure in a note, then extracts, compiles, copies (copy
//! pipeline only) and replaces each block in ascending line order. A failing
//! figure is recorded and left untouched; the rest of the note still
//! converts.

use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::compile::{CompileOptions, FigureCompiler, Pipeline};
use crate::constants as C;
use crate::document::SourceDocument;
use crate::error::{Error, Result};
use crate::extract::extract_block_end;
use crate::macros::FigureMacro;
use crate::reference::{find_figures, ReferenceStyle};
use crate::store::FileStore;

/// A figure that was rewritten
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedFigure {
    /// 0-based index of the reference line
    pub line: usize,
    /// 0-based index of the last line of the block
    pub end: usize,
    /// Embed syntax
    pub style: ReferenceStyle,
    /// File the figure resolved to
    pub source: PathBuf,
    /// Path written into the macro
    pub path: String,
    /// Emitted macro
    pub figure: FigureMacro,
    /// Copy destination, if the file was copied
    pub copied_to: Option<PathBuf>,
}

/// A figure that could not be converted
#[derive(Debug, Serialize)]
pub struct FigureFailure {
    /// 0-based index of the reference line
    pub line: usize,
    /// What went wrong
    #[serde(serialize_with = "serialize_display")]
    pub error: Error,
}

/// Outcome of converting one note
#[derive(Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Rewritten figures, in line order
    pub converted: Vec<ConvertedFigure>,
    /// Failed figures, in line order
    pub failed: Vec<FigureFailure>,
    /// Reference lines skipped because an earlier block already covered them
    pub skipped: Vec<usize>,
}

impl ConversionReport {
    /// Whether every figure converted
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Converts notes with one set of options
pub struct Converter<'a, S: FileStore + ?Sized> {
    store: &'a S,
    options: CompileOptions,
    lookahead: usize,
    copy_root: Option<PathBuf>,
}

impl<'a, S: FileStore + ?Sized> Converter<'a, S> {
    /// Create a converter; nothing is copied until a copy root is set
    pub fn new(store: &'a S, options: CompileOptions) -> Self {
        Self {
            store,
            options,
            lookahead: C::DEFAULT_LOOKAHEAD,
            copy_root: None,
        }
    }

    /// Set how many lines after a reference are scanned for directives.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Copy figures into `<root>/<fig_folder>/` (copy pipeline only).
    pub fn with_copy_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.copy_root = Some(root.into());
        self
    }

    /// Compile options in use
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Convert every figure in `doc` in place
    pub fn convert(&self, doc: &mut SourceDocument) -> ConversionReport {
        let figures = find_figures(doc.lines(), self.store, &self.options.vault_root);
        let compiler = FigureCompiler::new(self.store, &self.options);
        let mut report = ConversionReport::default();
        let mut consumed_until: Option<usize> = None;

        log::debug!("found {} figure reference(s)", figures.len());

        for (line, reference) in figures {
            if consumed_until.is_some_and(|end| line <= end) {
                log::warn!(
                    "line {}: reference inside previous figure block, skipped",
                    line + 1
                );
                report.skipped.push(line);
                continue;
            }

            // A failed figure still owns its block
            let result = extract_block_end(doc.lines(), line, self.lookahead).and_then(|end| {
                consumed_until = Some(end);
                self.convert_block(doc, &compiler, line, end, reference.style)
            });

            match result {
                Ok(figure) => report.converted.push(figure),
                Err(error) => {
                    let error = error.at_line(line);
                    log::warn!("{}", error);
                    report.failed.push(FigureFailure { line, error });
                }
            }
        }

        report
    }

    fn convert_block(
        &self,
        doc: &mut SourceDocument,
        compiler: &FigureCompiler<'_, S>,
        line: usize,
        end: usize,
        style: ReferenceStyle,
    ) -> Result<ConvertedFigure> {
        let compiled = compiler.compile(doc.block(line, end)?, style)?;

        let copied_to = match (&self.options.pipeline, &self.copy_root) {
            (Pipeline::Copy { fig_folder: Some(folder) }, Some(root)) => {
                let destination = root.join(folder).join(&compiled.file_name);
                self.store.copy_file(&compiled.source, &destination)?;
                log::info!(
                    "copied {} -> {}",
                    compiled.source.display(),
                    destination.display()
                );
                Some(destination)
            }
            _ => None,
        };

        doc.replace_block(line, end, compiled.lines)?;

        Ok(ConvertedFigure {
            line,
            end,
            style,
            source: compiled.source,
            path: compiled.path,
            figure: compiled.figure,
            copied_to,
        })
    }
}

fn serialize_display<T: std::fmt::Display, Ser: Serializer>(
    value: &T,
    serializer: Ser,
) -> std::result::Result<Ser::Ok, Ser::Error> {
    serializer.collect_str(value)
}
