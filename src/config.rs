//! Configuration and root resolution
//!
//! Settings come from a YAML file; every key is optional. Roots follow a
//! fixed priority:
//! - vault root: `--vault`, `EMX_FIGURE_VAULT`, then the note's directory
//! - image root: `--image-root`, `EMX_FIGURE_IMAGE_ROOT`, config
//!   `image_root` (relative to the vault), then the vault root
//! - config file: `--config`, `EMX_FIGURE_CONFIG`, `<vault>/.emx-figure.yaml`,
//!   then `<config dir>/emx-figure/config.yaml`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compile::{CompileOptions, DimensionPriority, FigureDefaults, Pipeline};
use crate::constants as C;
use crate::error::Result;
use crate::macros::MacroTable;

/// Overrides taken from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// `EMX_FIGURE_VAULT`
    pub vault: Option<PathBuf>,
    /// `EMX_FIGURE_IMAGE_ROOT`
    pub image_root: Option<PathBuf>,
    /// `EMX_FIGURE_CONFIG`
    pub config: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> Self {
        Self {
            vault: env_path(C::ENV_VAULT),
            image_root: env_path(C::ENV_IMAGE_ROOT),
            config: env_path(C::ENV_CONFIG),
        }
    }
}

// Treat empty values as unset
fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Vault root: explicit flag, then environment, then `fallback`
pub fn resolve_vault_root(flag: Option<&Path>, env: &EnvOverrides, fallback: &Path) -> PathBuf {
    flag.or(env.vault.as_deref())
        .unwrap_or(fallback)
        .to_path_buf()
}

/// Directory containing `note`, or `.` for a bare file name
pub fn note_dir(note: &Path) -> PathBuf {
    match note.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Converter settings loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Lines scanned after a reference for directives
    pub lookahead: usize,
    /// Copy pipeline destination folder; `null` leaves it unset
    pub fig_folder: Option<String>,
    /// Wikilink search root, relative to the vault unless absolute
    pub image_root: Option<PathBuf>,
    /// Overrides the pipeline's dimension priority
    pub priority: Option<DimensionPriority>,
    /// Dimension defaults and units
    pub defaults: FigureDefaults,
    /// Output macro names
    pub macros: MacroTable,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            lookahead: C::DEFAULT_LOOKAHEAD,
            fig_folder: Some(C::DEFAULT_FIG_FOLDER.to_string()),
            image_root: None,
            priority: None,
            defaults: FigureDefaults::default(),
            macros: MacroTable::default(),
        }
    }
}

impl FigureConfig {
    /// Parse YAML; an empty document gives the defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        log::debug!("loaded config from {}", path.display());
        Self::from_yaml(&content)
    }

    /// Find and load the config for `vault_root`
    ///
    /// An explicit path (flag or environment) must exist. Otherwise the vault
    /// file and then the user config file are tried; with neither, the
    /// defaults apply.
    pub fn discover(
        explicit: Option<&Path>,
        env: &EnvOverrides,
        vault_root: &Path,
    ) -> Result<Self> {
        let global = dirs::config_dir()
            .map(|dir| dir.join(C::CONFIG_DIR_NAME).join(C::CONFIG_FILENAME));
        Self::discover_with(explicit, env, vault_root, global)
    }

    fn discover_with(
        explicit: Option<&Path>,
        env: &EnvOverrides,
        vault_root: &Path,
        global: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(path) = explicit.or(env.config.as_deref()) {
            return Self::load(path);
        }

        let candidates = [Some(vault_root.join(C::VAULT_CONFIG_FILENAME)), global];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                return Self::load(&path);
            }
        }

        log::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Image root: flag, environment, config, then the vault root
    pub fn resolve_image_root(
        &self,
        flag: Option<&Path>,
        env: &EnvOverrides,
        vault_root: &Path,
    ) -> PathBuf {
        if let Some(root) = flag.or(env.image_root.as_deref()) {
            return root.to_path_buf();
        }

        match &self.image_root {
            Some(root) => vault_root.join(root),
            None => vault_root.to_path_buf(),
        }
    }

    /// Copy pipeline using `fig_folder` if given, else the configured folder
    pub fn copy_pipeline(&self, fig_folder: Option<String>) -> Pipeline {
        Pipeline::Copy {
            fig_folder: fig_folder.or_else(|| self.fig_folder.clone()),
        }
    }

    /// Build compile options from this config
    pub fn compile_options(
        &self,
        pipeline: Pipeline,
        vault_root: &Path,
        image_root: PathBuf,
    ) -> CompileOptions {
        let options = CompileOptions::new(pipeline, vault_root)
            .with_image_root(image_root)
            .with_defaults(self.defaults.clone())
            .with_macros(self.macros.clone());

        match self.priority {
            Some(priority) => options.with_priority(priority),
            None => options,
        }
    }
}
