//! Figure directive compilation
//!
//! Turns one extracted figure block into a single macro line. The output
//! always has as many lines as the block; everything after the macro is an
//! empty string, so line indices of later figures stay valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::attributes::{Dimensions, FigureAttributes};
use crate::constants as C;
use crate::error::{Error, Result};
use crate::macros::{FigureMacro, MacroTable};
use crate::reference::{FigureReference, ReferenceStyle};
use crate::store::FileStore;
use crate::util;

/// Which dimension governs a figure that has no caption
///
/// The two pipelines historically disagree when both `:fw:` and `:fh:` are
/// given, so both orders are kept as named policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DimensionPriority {
    /// `:fw:` wins over `:fh:` (copy pipeline)
    WidthFirst,
    /// `:fh:` wins over `:fw:` (in-place pipeline)
    HeightFirst,
}

/// Where emitted figure paths point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pipeline {
    /// Figures get copied into `fig_folder` next to the output document and
    /// are referenced as `<fig_folder>/<file name>`
    Copy { fig_folder: Option<String> },
    /// Figures stay where they are and are referenced by absolute path
    InPlace,
}

impl Pipeline {
    /// Dimension priority this pipeline uses unless overridden
    pub fn default_priority(&self) -> DimensionPriority {
        match self {
            Pipeline::Copy { .. } => DimensionPriority::WidthFirst,
            Pipeline::InPlace => DimensionPriority::HeightFirst,
        }
    }
}

/// Defaults for figures that leave a dimension out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureDefaults {
    /// Width used when none is given, also for captioned figures and a
    /// bare `:fw:`
    pub width: String,
    /// Height used for a bare `:fh:`
    pub height: String,
    /// Unit appended to `:fw:` values
    pub width_unit: String,
    /// Unit appended to `:fh:` values
    pub height_unit: String,
}

impl Default for FigureDefaults {
    fn default() -> Self {
        Self {
            width: C::DEFAULT_WIDTH.to_string(),
            height: C::DEFAULT_HEIGHT.to_string(),
            width_unit: C::DEFAULT_WIDTH_UNIT.to_string(),
            height_unit: C::DEFAULT_HEIGHT_UNIT.to_string(),
        }
    }
}

/// Options for compiling figure blocks
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Path emission rule
    pub pipeline: Pipeline,
    /// Width/height precedence without caption
    pub priority: DimensionPriority,
    /// Dimension defaults and units
    pub defaults: FigureDefaults,
    /// Output macro names
    pub macros: MacroTable,
    /// Base for inline references
    pub vault_root: PathBuf,
    /// Search root for wikilink references
    pub image_root: PathBuf,
}

impl CompileOptions {
    /// Create options for a pipeline; the image root starts as the vault root
    pub fn new(pipeline: Pipeline, vault_root: impl Into<PathBuf>) -> Self {
        let vault_root = vault_root.into();
        Self {
            priority: pipeline.default_priority(),
            pipeline,
            defaults: FigureDefaults::default(),
            macros: MacroTable::default(),
            image_root: vault_root.clone(),
            vault_root,
        }
    }

    /// Set the wikilink search root.
    pub fn with_image_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.image_root = root.into();
        self
    }

    /// Override the pipeline's dimension priority.
    pub fn with_priority(mut self, priority: DimensionPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set dimension defaults.
    pub fn with_defaults(mut self, defaults: FigureDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the macro table.
    pub fn with_macros(mut self, macros: MacroTable) -> Self {
        self.macros = macros;
        self
    }
}

/// Result of compiling one figure block
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFigure {
    /// File on disk the figure refers to, after PDF substitution
    pub source: PathBuf,
    /// File name of `source`
    pub file_name: String,
    /// Path as written into the macro
    pub path: String,
    /// Chosen macro and arguments
    pub figure: FigureMacro,
    /// Replacement lines, same length as the block
    pub lines: Vec<String>,
}

/// Compiles figure blocks against a [`FileStore`]
pub struct FigureCompiler<'a, S: FileStore + ?Sized> {
    store: &'a S,
    options: &'a CompileOptions,
}

impl<'a, S: FileStore + ?Sized> FigureCompiler<'a, S> {
    /// Create a new compiler
    pub fn new(store: &'a S, options: &'a CompileOptions) -> Self {
        Self { store, options }
    }

    /// Compile a figure block whose first line is a `style` reference
    pub fn compile<L: AsRef<str>>(
        &self,
        block: &[L],
        style: ReferenceStyle,
    ) -> Result<CompiledFigure> {
        let first = block.first().map(|l| l.as_ref()).unwrap_or("");
        let reference = style.parse(first).ok_or_else(|| Error::MalformedReference {
            style,
            line: first.to_string(),
        })?;

        let source = self.resolve(&reference)?;
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| reference.target.clone());

        let defaults = &self.options.defaults;
        let dims = Dimensions {
            width_unit: &defaults.width_unit,
            height_unit: &defaults.height_unit,
            default_width: &defaults.width,
            default_height: &defaults.height,
        };
        let attributes = FigureAttributes::parse(&block[1..], dims);

        let path = self.emitted_path(&source, &file_name)?;
        let figure = self.select_macro(attributes, path.clone());
        log::debug!("{} -> {:?}", reference.target, figure);

        let mut lines = Vec::with_capacity(block.len());
        lines.push(self.options.macros.render(&figure));
        lines.resize(block.len(), String::new());

        Ok(CompiledFigure {
            source,
            file_name,
            path,
            figure,
            lines,
        })
    }

    /// Locate the file a reference points to, preferring a PDF sibling
    pub fn resolve(&self, reference: &FigureReference) -> Result<PathBuf> {
        let located = reference.locate(
            self.store,
            &self.options.vault_root,
            &self.options.image_root,
        )?;
        Ok(self.prefer_pdf(located))
    }

    /// Use a sibling `<stem>.pdf` when one exists
    fn prefer_pdf(&self, path: PathBuf) -> PathBuf {
        if util::is_pdf(&path) {
            return path;
        }

        let sibling = path.with_extension(C::PDF_EXTENSION);
        if self.store.path_exists(&sibling) {
            log::debug!("using {} instead of {}", sibling.display(), path.display());
            sibling
        } else {
            path
        }
    }

    /// Path written into the macro, per pipeline
    fn emitted_path(&self, source: &Path, file_name: &str) -> Result<String> {
        match &self.options.pipeline {
            Pipeline::Copy { fig_folder } => {
                let folder = fig_folder.as_deref().ok_or(Error::MissingDestination)?;
                let folder = folder.trim_end_matches(['/', '\\']);
                if folder.is_empty() {
                    Ok(file_name.to_string())
                } else {
                    Ok(format!("{}/{}", util::display_path(Path::new(folder)), file_name))
                }
            }
            Pipeline::InPlace => {
                let absolute = dunce::canonicalize(source)
                    .or_else(|_| std::path::absolute(source))
                    .unwrap_or_else(|_| source.to_path_buf());
                Ok(util::display_path(&absolute))
            }
        }
    }

    /// Pick the macro: caption first, then the governing dimension, then defaults
    fn select_macro(&self, attributes: FigureAttributes, path: String) -> FigureMacro {
        let defaults = &self.options.defaults;
        let FigureAttributes {
            width,
            height,
            caption,
            label,
        } = attributes;

        if let Some(caption) = caption {
            let caption = match label {
                Some(label) => self.options.macros.fold_label(&caption, &label),
                None => caption,
            };
            return FigureMacro::Captioned {
                width: width.unwrap_or_else(|| defaults.width.clone()),
                path,
                caption,
            };
        }

        if let Some(label) = label {
            log::debug!("label '{}' dropped, figure has no caption", label);
        }

        match (self.options.priority, width, height) {
            (DimensionPriority::WidthFirst, Some(width), _) => {
                FigureMacro::Standard { width, path }
            }
            (DimensionPriority::HeightFirst, _, Some(height)) => {
                FigureMacro::Vertical { height, path }
            }
            (_, _, Some(height)) => FigureMacro::Vertical { height, path },
            (_, Some(width), _) => FigureMacro::Standard { width, path },
            (_, None, None) => FigureMacro::Standard {
                width: defaults.width.clone(),
                path,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DiskStore;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    /// In-memory store: `**/<name>` patterns match by trailing components
    #[derive(Default)]
    struct MemoryStore {
        files: BTreeSet<PathBuf>,
    }

    impl MemoryStore {
        fn with_files(files: &[&str]) -> Self {
            Self {
                files: files.iter().map(PathBuf::from).collect(),
            }
        }
    }

    impl FileStore for MemoryStore {
        fn unique_file_under(&self, root: &Path, pattern: &str) -> Result<PathBuf> {
            let name = pattern.trim_start_matches("**/");
            let mut candidates: Vec<PathBuf> = self
                .files
                .iter()
                .filter(|p| p.starts_with(root) && p.ends_with(name))
                .cloned()
                .collect();
            match candidates.len() {
                0 => Err(Error::NoMatch {
                    pattern: pattern.to_string(),
                    root: root.to_path_buf(),
                }),
                1 => Ok(candidates.remove(0)),
                _ => Err(Error::AmbiguousMatch {
                    pattern: pattern.to_string(),
                    candidates,
                }),
            }
        }

        fn path_exists(&self, path: &Path) -> bool {
            self.files.contains(path)
        }

        fn copy_file(&self, _src: &Path, _dst: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn copy_options() -> CompileOptions {
        CompileOptions::new(
            Pipeline::Copy {
                fig_folder: Some("figs".to_string()),
            },
            "/vault",
        )
        .with_macros(MacroTable::call_style())
    }

    fn in_place_options() -> CompileOptions {
        CompileOptions::new(Pipeline::InPlace, "/vault").with_macros(MacroTable::call_style())
    }

    fn compile_with(
        store: &MemoryStore,
        options: &CompileOptions,
        block: &[&str],
    ) -> Result<CompiledFigure> {
        let style = ReferenceStyle::detect(block[0])
            .map(|r| r.style)
            .unwrap_or(ReferenceStyle::Wiki);
        FigureCompiler::new(store, options).compile(block, style)
    }

    #[test]
    fn test_width_directive_with_trailing_blank() {
        let store = MemoryStore::with_files(&["/vault/img/diagram.png"]);
        let block = ["![[diagram.png]]", ":fw:0.5", ""];
        let out = compile_with(&store, &copy_options(), &block).unwrap();
        assert_eq!(
            out.lines,
            vec!["STANDARD_FIGURE(0.5\\textwidth, figs/diagram.png)", "", ""]
        );
    }

    #[test]
    fn test_caption_with_label() {
        let store = MemoryStore::with_files(&["/vault/plot.png"]);
        let out = compile_with(
            &store,
            &copy_options(),
            &["![[plot.png]]", "caption: A plot", "label: fig:plot"],
        )
        .unwrap();
        assert_eq!(
            out.lines[0],
            "CAPTIONED_FIGURE(0.9\\textwidth, figs/plot.png, A plot \\label{fig:plot})"
        );
        assert_eq!(out.lines.len(), 3);
    }

    #[test]
    fn test_caption_wins_over_dimensions() {
        let store = MemoryStore::with_files(&["/vault/plot.png"]);
        for options in [copy_options(), in_place_options()] {
            let out = compile_with(
                &store,
                &options,
                &["![[plot.png]]", ":fh:0.4", ":fw:0.6", "caption: Both"],
            )
            .unwrap();
            match out.figure {
                FigureMacro::Captioned { width, caption, .. } => {
                    assert_eq!(width, "0.6\\textwidth");
                    assert_eq!(caption, "Both");
                }
                other => panic!("expected captioned figure, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_default_width_without_directives() {
        let store = MemoryStore::with_files(&["/vault/plot.png"]);
        let out = compile_with(&store, &copy_options(), &["![[plot.png]]"]).unwrap();
        assert_eq!(
            out.figure,
            FigureMacro::Standard {
                width: C::DEFAULT_WIDTH.to_string(),
                path: "figs/plot.png".to_string(),
            }
        );
    }

    #[test]
    fn test_label_without_caption_is_dropped() {
        let store = MemoryStore::with_files(&["/vault/plot.png"]);
        let block = ["![[plot.png]]", "label: fig:x"];
        let out = compile_with(&store, &copy_options(), &block).unwrap();
        assert_eq!(out.lines[0], "STANDARD_FIGURE(0.9\\textwidth, figs/plot.png)");
    }

    #[test]
    fn test_width_first_policy() {
        let store = MemoryStore::with_files(&["/vault/plot.png"]);
        let options = copy_options();

        let block = ["![[plot.png]]", ":fh:0.5", ":fw:0.7"];
        let both = compile_with(&store, &options, &block).unwrap();
        assert_eq!(both.lines[0], "STANDARD_FIGURE(0.7\\textwidth, figs/plot.png)");

        let height_only = compile_with(&store, &options, &["![[plot.png]]", ":fh:0.5"]).unwrap();
        assert_eq!(height_only.lines[0], "VERTICAL_FIGURE(0.5\\textheight, figs/plot.png)");
    }

    #[test]
    fn test_height_first_policy() {
        let store = MemoryStore::with_files(&["/vault/plot.png"]);
        let options = copy_options().with_priority(DimensionPriority::HeightFirst);

        let block = ["![[plot.png]]", ":fw:0.7", ":fh:0.5"];
        let both = compile_with(&store, &options, &block).unwrap();
        assert_eq!(both.lines[0], "VERTICAL_FIGURE(0.5\\textheight, figs/plot.png)");

        let width_only = compile_with(&store, &options, &["![[plot.png]]", ":fw:0.7"]).unwrap();
        assert_eq!(width_only.lines[0], "STANDARD_FIGURE(0.7\\textwidth, figs/plot.png)");
    }

    #[test]
    fn test_bare_height_uses_configured_default() {
        let store = MemoryStore::with_files(&["/vault/p.png"]);
        let defaults = FigureDefaults {
            height: "0.1\\textheight".to_string(),
            ..FigureDefaults::default()
        };

        for options in [copy_options(), in_place_options()] {
            let options = options.with_defaults(defaults.clone());
            let out = compile_with(&store, &options, &["![[p.png]]", ":fh:"]).unwrap();
            assert_eq!(
                out.figure,
                FigureMacro::Vertical {
                    height: "0.1\\textheight".to_string(),
                    path: out.path.clone(),
                }
            );
        }

        // Nothing given still falls back to the default width
        let options = in_place_options().with_defaults(defaults);
        let out = compile_with(&store, &options, &["![[p.png]]"]).unwrap();
        assert_eq!(
            out.figure,
            FigureMacro::Standard {
                width: C::DEFAULT_WIDTH.to_string(),
                path: out.path.clone(),
            }
        );
    }

    #[test]
    fn test_bare_width_uses_configured_default() {
        let store = MemoryStore::with_files(&["/vault/p.png"]);
        let options = copy_options().with_defaults(FigureDefaults {
            width: "0.4\\linewidth".to_string(),
            ..FigureDefaults::default()
        });
        let out = compile_with(&store, &options, &["![[p.png]]", ":fw:", ":fh:0.3"]).unwrap();
        assert_eq!(out.lines[0], "STANDARD_FIGURE(0.4\\linewidth, figs/p.png)");
    }

    #[test]
    fn test_pipeline_default_priority() {
        assert_eq!(copy_options().priority, DimensionPriority::WidthFirst);
        assert_eq!(in_place_options().priority, DimensionPriority::HeightFirst);
    }

    #[test]
    fn test_prefers_pdf_sibling() {
        let store = MemoryStore::with_files(&["/vault/img/foo.png", "/vault/img/foo.pdf"]);
        let out = compile_with(&store, &copy_options(), &["![[foo.png]]"]).unwrap();
        assert_eq!(out.source, PathBuf::from("/vault/img/foo.pdf"));
        assert_eq!(out.file_name, "foo.pdf");
        assert!(out.path.ends_with(".pdf"));
    }

    #[test]
    fn test_resolve_reference() {
        let store = MemoryStore::with_files(&[
            "/vault/img/foo.png",
            "/vault/img/foo.pdf",
            "/vault/bar.jpg",
        ]);
        let options = copy_options();
        let compiler = FigureCompiler::new(&store, &options);

        let foo = ReferenceStyle::Wiki.parse("![[foo.png]]").unwrap();
        assert_eq!(compiler.resolve(&foo).unwrap(), PathBuf::from("/vault/img/foo.pdf"));

        let bar = ReferenceStyle::Inline.parse("![](bar.jpg)").unwrap();
        assert_eq!(compiler.resolve(&bar).unwrap(), PathBuf::from("/vault/bar.jpg"));
    }

    #[test]
    fn test_no_pdf_sibling_keeps_raster() {
        let store = MemoryStore::with_files(&["/vault/img/foo.png", "/vault/other/foo.pdf"]);
        let out = compile_with(&store, &copy_options(), &["![[foo.png]]"]).unwrap();
        assert_eq!(out.path, "figs/foo.png");
    }

    #[test]
    fn test_output_length_matches_block() {
        let store = MemoryStore::with_files(&["/vault/plot.png"]);
        let blocks: [&[&str]; 4] = [
            &["![[plot.png]]"],
            &["![[plot.png]]", ""],
            &["![[plot.png]]", ":fw:0.5", "", "caption: c"],
            &["![[plot.png]]", "", "", "", "", ""],
        ];
        for block in blocks {
            let out = compile_with(&store, &copy_options(), block).unwrap();
            assert_eq!(out.lines.len(), block.len());
            assert!(out.lines[1..].iter().all(|l| l.is_empty()));
        }
    }

    #[test]
    fn test_deterministic() {
        let store = MemoryStore::with_files(&["/vault/plot.png", "/vault/plot.pdf"]);
        let block = ["![[plot.png]]", ":fw:0.3", "caption: Same", "label: fig:same"];
        let first = compile_with(&store, &copy_options(), &block).unwrap();
        let second = compile_with(&store, &copy_options(), &block).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_destination() {
        let store = MemoryStore::with_files(&["/vault/plot.png"]);
        let options = CompileOptions::new(Pipeline::Copy { fig_folder: None }, "/vault");
        let err = compile_with(&store, &options, &["![[plot.png]]"]).unwrap_err();
        assert!(matches!(err, Error::MissingDestination));
    }

    #[test]
    fn test_empty_fig_folder_emits_bare_name() {
        let store = MemoryStore::with_files(&["/vault/plot.png"]);
        let options = CompileOptions::new(
            Pipeline::Copy {
                fig_folder: Some(String::new()),
            },
            "/vault",
        );
        let out = compile_with(&store, &options, &["![[plot.png]]"]).unwrap();
        assert_eq!(out.path, "plot.png");
    }

    #[test]
    fn test_malformed_reference() {
        let store = MemoryStore::default();
        let options = copy_options();
        let compiler = FigureCompiler::new(&store, &options);

        let err = compiler.compile(&["just text"], ReferenceStyle::Wiki).unwrap_err();
        assert!(matches!(err, Error::MalformedReference { style: ReferenceStyle::Wiki, .. }));

        let err = compiler.compile(&["![[a.png]]"], ReferenceStyle::Inline).unwrap_err();
        assert!(matches!(err, Error::MalformedReference { style: ReferenceStyle::Inline, .. }));

        let empty: [&str; 0] = [];
        assert!(compiler.compile(&empty, ReferenceStyle::Wiki).is_err());
    }

    #[test]
    fn test_wikilink_not_found() {
        let store = MemoryStore::with_files(&["/vault/other.png"]);
        let err = compile_with(&store, &copy_options(), &["![[plot.png]]"]).unwrap_err();
        assert!(matches!(err, Error::NoMatch { .. }));
    }

    #[test]
    fn test_wikilink_ambiguous() {
        let store = MemoryStore::with_files(&["/vault/a/plot.png", "/vault/b/plot.png"]);
        let err = compile_with(&store, &copy_options(), &["![[plot.png]]"]).unwrap_err();
        match err {
            Error::AmbiguousMatch { candidates, .. } => assert_eq!(candidates.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_wikilink_searches_image_root() {
        let store = MemoryStore::with_files(&["/vault/notes/plot.png", "/vault/assets/plot.png"]);
        let options = copy_options().with_image_root("/vault/assets");
        let out = compile_with(&store, &options, &["![[plot.png]]"]).unwrap();
        assert_eq!(out.source, PathBuf::from("/vault/assets/plot.png"));
    }

    #[test]
    fn test_inline_resolves_against_vault_root() {
        let store = MemoryStore::with_files(&["/vault/att/my plot.png"]);
        let out = compile_with(
            &store,
            &copy_options(),
            &["![A plot](att/my%20plot.png)", ":fw:0.4"],
        )
        .unwrap();
        assert_eq!(out.source, PathBuf::from("/vault/att/my plot.png"));
        assert_eq!(out.lines[0], "STANDARD_FIGURE(0.4\\textwidth, figs/my plot.png)");
    }

    #[test]
    fn test_in_place_emits_absolute_path() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("img")).unwrap();
        fs::write(temp_dir.path().join("img/tall.png"), b"png").unwrap();
        fs::write(temp_dir.path().join("img/tall.pdf"), b"pdf").unwrap();

        let options = CompileOptions::new(Pipeline::InPlace, temp_dir.path())
            .with_macros(MacroTable::call_style());
        let compiler = FigureCompiler::new(&DiskStore, &options);
        let out = compiler
            .compile(&["![[tall.png]]", ":fw:0.3", ":fh:0.6"], ReferenceStyle::Wiki)
            .unwrap();

        let expected = dunce::canonicalize(temp_dir.path().join("img/tall.pdf")).unwrap();
        assert_eq!(out.path, util::display_path(&expected));
        assert!(Path::new(&out.path).is_absolute());
        assert_eq!(
            out.lines[0],
            format!("VERTICAL_FIGURE(0.6\\textheight, {})", out.path)
        );
    }

    #[test]
    fn test_latex_output() {
        let store = MemoryStore::with_files(&["/vault/plot.png"]);
        let options = CompileOptions::new(
            Pipeline::Copy {
                fig_folder: Some("figs/".to_string()),
            },
            "/vault",
        );
        let block = ["![[plot.png]]", "caption: Hi", "label: fig:hi"];
        let out = compile_with(&store, &options, &block).unwrap();
        assert_eq!(
            out.lines[0],
            "\\mycaptionfig{0.9\\textwidth}{figs/plot.png}{Hi \\label{fig:hi}}"
        );
    }
}
