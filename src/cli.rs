use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// emx-figure - Turn vault image embeds into LaTeX figure macros
///
/// # Quick Reference
///
/// ## Figure Directives
///
/// ```markdown
/// ![[plot.png]]
/// :fw:0.6
/// caption: Measured response
/// label: fig:response
/// ```
///
/// Directives sit on the lines right after the embed, in any order:
/// - `:fw:<n>`: width, written as `<n>\textwidth`
/// - `:fh:<n>`: height, written as `<n>\textheight`
/// - `caption:<text>`: captioned figure
/// - `label:<text>`: appended to the caption as `\label{..}`
///
/// ## Convert
///
/// ```bash
/// emx-figure convert lecture.md                  # LaTeX-ready markdown on stdout
/// emx-figure convert lecture.md -o out/lecture.md  # Copies figures into out/figs/
/// emx-figure convert lecture.md --fig-folder img  # Use out/img/ instead
/// emx-figure convert lecture.md --in-place-paths  # Absolute paths, no copying
/// emx-figure convert lecture.md --dry-run --json  # Report only
/// ```
///
/// ## Resolve
///
/// ```bash
/// emx-figure resolve plot.png       # Unique file under the image root
/// ```
///
/// ## Numbered Folders
///
/// ```bash
/// emx-figure next-folder                         # Next free class_NN_*
/// emx-figure next-folder --pattern "week_{}_*"
/// ```
///
/// ## Environment Variables
///
/// - `EMX_FIGURE_VAULT`: vault root (default: the note's directory)
/// - `EMX_FIGURE_IMAGE_ROOT`: wikilink search root (default: vault root)
/// - `EMX_FIGURE_CONFIG`: config file (default: <vault>/.emx-figure.yaml)
/// - `RUST_LOG`: log filter
///
#[derive(Parser, Debug)]
#[command(name = "emx-figure")]
#[command(version)]
#[command(about = "Turn vault image embeds into LaTeX figure macros")]
pub struct Cli {
    /// Vault root (default: $EMX_FIGURE_VAULT or the note's directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub vault: Option<PathBuf>,

    /// Wikilink search root (default: $EMX_FIGURE_IMAGE_ROOT, config, or the vault)
    #[arg(long, global = true, value_name = "PATH")]
    pub image_root: Option<PathBuf>,

    /// Config file (default: $EMX_FIGURE_CONFIG, <vault>/.emx-figure.yaml, user config)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert figure embeds in a note to figure macros
    #[command(alias = "c")]
    Convert {
        /// Markdown note to convert
        note: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Reference figures by absolute path instead of copying them
        #[arg(long)]
        in_place_paths: bool,

        /// Folder (next to the output) that figures are copied into
        #[arg(long, value_name = "DIR", conflicts_with = "in_place_paths")]
        fig_folder: Option<String>,

        /// Lines after an embed scanned for directives
        #[arg(long, value_name = "N")]
        lookahead: Option<usize>,

        /// Do not copy figures
        #[arg(long)]
        dry_run: bool,

        /// Print the conversion report as JSON on stderr
        #[arg(short = 'j', long)]
        json: bool,
    },

    /// Find the file a wikilink embed resolves to
    #[command(alias = "rv")]
    Resolve {
        /// Image name as written inside `![[...]]`
        name: String,
    },

    /// Print the next free number for a numbered folder
    NextFolder {
        /// Directory holding the numbered folders (default: current directory)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Folder template, `{}` is replaced by a two-digit number
        #[arg(short, long, default_value = crate::constants::DEFAULT_FOLDER_TEMPLATE)]
        pattern: String,
    },
}
