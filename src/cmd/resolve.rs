//! Resolve command

use std::path::Path;

use emx_figure::config::{self, EnvOverrides, FigureConfig};
use emx_figure::util::display_path;
use emx_figure::{Cli, DiskStore, FigureCompiler, FigureReference, Pipeline, ReferenceStyle, Result};

/// Print the file an embed resolves to; accepts `name.png` or `![[name.png]]`
pub fn run(cli: &Cli, env: &EnvOverrides, name: &str) -> Result<()> {
    let vault_root = config::resolve_vault_root(cli.vault.as_deref(), env, Path::new("."));
    let figure_config = FigureConfig::discover(cli.config.as_deref(), env, &vault_root)?;
    let image_root = figure_config.resolve_image_root(cli.image_root.as_deref(), env, &vault_root);
    let options = figure_config.compile_options(Pipeline::InPlace, &vault_root, image_root);

    let reference = ReferenceStyle::detect(name).unwrap_or_else(|| FigureReference {
        style: ReferenceStyle::Wiki,
        target: name.trim().to_string(),
        alt: None,
    });

    let path = FigureCompiler::new(&DiskStore, &options).resolve(&reference)?;
    println!("{}", display_path(&path));
    Ok(())
}
