//! Convert command
//!
//! Converts one note, writes the result to `--output` or stdout and lists
//! failed figures on stderr.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use emx_figure::config::{self, EnvOverrides, FigureConfig};
use emx_figure::util::display_path;
use emx_figure::{Cli, Converter, DiskStore, Pipeline, Result, SourceDocument};

/// Arguments of `emx-figure convert`
pub struct ConvertArgs<'a> {
    pub note: &'a Path,
    pub output: Option<&'a Path>,
    pub in_place_paths: bool,
    pub fig_folder: Option<String>,
    pub lookahead: Option<usize>,
    pub dry_run: bool,
    pub json: bool,
}

pub fn run(cli: &Cli, env: &EnvOverrides, args: ConvertArgs<'_>) -> Result<()> {
    let note_dir = config::note_dir(args.note);
    let vault_root = config::resolve_vault_root(cli.vault.as_deref(), env, &note_dir);
    let figure_config = FigureConfig::discover(cli.config.as_deref(), env, &vault_root)?;
    let image_root = figure_config.resolve_image_root(cli.image_root.as_deref(), env, &vault_root);

    let pipeline = if args.in_place_paths {
        Pipeline::InPlace
    } else {
        figure_config.copy_pipeline(args.fig_folder)
    };
    let options = figure_config.compile_options(pipeline, &vault_root, image_root);

    let mut converter = Converter::new(&DiskStore, options)
        .with_lookahead(args.lookahead.unwrap_or(figure_config.lookahead));
    if !args.dry_run {
        // Figures land next to the output document, or in the cwd for stdout
        let output_dir = args.output.map(config::note_dir).unwrap_or_else(|| PathBuf::from("."));
        converter = converter.with_copy_root(output_dir);
    }

    let mut doc = SourceDocument::load(args.note)?;
    let report = converter.convert(&mut doc);

    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            doc.save(path)?;
            eprintln!("Wrote: {}", display_path(path));
        }
        None => print!("{}", doc),
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(io::Error::from)?;
        eprintln!("{}", json);
    }

    eprintln!(
        "Converted {} figure(s), {} failed, {} skipped",
        report.converted.len(),
        report.failed.len(),
        report.skipped.len()
    );

    if report.is_clean() {
        Ok(())
    } else {
        for failure in &report.failed {
            eprintln!("  {}: {}", display_path(args.note), failure.error);
        }
        Err(io::Error::other(format!("{} figure(s) failed", report.failed.len())).into())
    }
}
