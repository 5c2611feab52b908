pub mod attributes;
pub mod cli;
pub mod compile;
pub mod config;
pub mod constants;
pub mod convert;
pub mod document;
pub mod error;
pub mod extract;
pub mod macros;
pub mod numbering;
pub mod reference;
pub mod store;
pub mod util;

pub use attributes::FigureAttributes;
pub use cli::{Cli, Command};
pub use compile::{
    CompileOptions, CompiledFigure, DimensionPriority, FigureCompiler, FigureDefaults, Pipeline,
};
pub use config::{EnvOverrides, FigureConfig};
pub use convert::{ConversionReport, Converter};
pub use document::SourceDocument;
pub use error::{Error, Result};
pub use extract::extract_block_end;
pub use macros::{FigureMacro, MacroSyntax, MacroTable};
pub use numbering::next_folder_number;
pub use reference::{find_figures, FigureReference, ReferenceStyle};
pub use store::{DiskStore, FileStore};
