//! Application configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config FILE`, or `config.toml` in the platform config dir)
//! 3. Environment variables prefixed `DUPE_SIDECAR_` (e.g. `DUPE_SIDECAR_DELETE_MODE=trash`)
//! 4. Command-line flags (see [`Config::merge_cli`])
//!
//! # Example
//!
//! ```toml
//! sidecar_extension = ".dupes"
//! merge_existing_sidecars = true
//! delete_duplicate_sidecars = true
//! exclude_sidecars = true
//! jdupes_path = "jdupes"
//! jdupes_hash_db = "/var/cache/jdupes.db"
//! jdupes_extra_args = ["--size"]
//! dry_run_output = "dry_run_output.txt"
//! delete_mode = "permanent"
//! show_progress = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::delete::DeleteMode;
use crate::actions::resolve::ResolveOptions;
use crate::actions::sidecar::{SidecarError, SidecarExtension, DEFAULT_SIDECAR_EXTENSION};
use crate::cli::Cli;
use crate::scanner::{ScannerConfig, DEFAULT_JDUPES_PATH};

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "DUPE_SIDECAR_";

/// Default dry run report file.
pub const DEFAULT_DRY_RUN_OUTPUT: &str = "dry_run_output.txt";

/// Keys accepted in the configuration file.
pub const KNOWN_KEYS: &[&str] = &[
    "sidecar_extension",
    "merge_existing_sidecars",
    "delete_duplicate_sidecars",
    "exclude_sidecars",
    "jdupes_path",
    "jdupes_hash_db",
    "jdupes_extra_args",
    "dry_run_output",
    "delete_mode",
    "show_progress",
];

/// Configuration could not be loaded or is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed into a [`Config`].
    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),

    /// The configured sidecar extension is unusable.
    #[error(transparent)]
    Sidecar(#[from] SidecarError),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extension appended to a survivor's path to name its sidecar.
    pub sidecar_extension: String,
    /// Merge the sidecars of deleted files into the survivor's sidecar.
    pub merge_existing_sidecars: bool,
    /// Delete victim sidecars after merging them.
    pub delete_duplicate_sidecars: bool,
    /// Exclude sidecar files from the jdupes scan.
    pub exclude_sidecars: bool,
    /// jdupes executable.
    pub jdupes_path: PathBuf,
    /// jdupes hash database.
    pub jdupes_hash_db: Option<PathBuf>,
    /// Extra jdupes arguments, placed before the directories.
    pub jdupes_extra_args: Vec<String>,
    /// Dry run report destination.
    pub dry_run_output: PathBuf,
    /// How duplicates are removed.
    pub delete_mode: DeleteMode,
    /// Show progress during the run.
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sidecar_extension: DEFAULT_SIDECAR_EXTENSION.to_string(),
            merge_existing_sidecars: true,
            delete_duplicate_sidecars: true,
            exclude_sidecars: true,
            jdupes_path: PathBuf::from(DEFAULT_JDUPES_PATH),
            jdupes_hash_db: None,
            jdupes_extra_args: Vec::new(),
            dry_run_output: PathBuf::from(DEFAULT_DRY_RUN_OUTPUT),
            delete_mode: DeleteMode::Permanent,
            show_progress: false,
        }
    }
}

impl Config {
    /// Load from the default config file (if any) and the environment.
    ///
    /// # Errors
    ///
    /// See [`load_from_path`](Self::load_from_path).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(None)
    }

    /// Load configuration, reading `path` if given, else the default file.
    ///
    /// An explicit file that is missing or invalid is an error. The default
    /// file is optional, and if it cannot be parsed it is skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing explicit file and `Invalid` when the
    /// layers cannot be extracted.
    pub fn load_from_path(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some();
        let file = match path {
            Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };

        if let Some(file) = &file {
            log::debug!("Loading configuration from {}", file.display());
            warn_unknown_keys(file);
        }

        match Self::figment(file.as_deref()).extract() {
            Ok(config) => Ok(config),
            Err(e) if !explicit && file.is_some() => {
                log::warn!("Ignoring invalid default config file: {}", e);
                Ok(Self::figment(None).extract()?)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Platform config file location, e.g. `~/.config/dupe-sidecar/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupe-sidecar").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line flags on top of the loaded layers.
    ///
    /// Only flags the user actually gave take effect.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(ext) = &cli.sidecar_extension {
            self.sidecar_extension = ext.clone();
        }
        if cli.no_merge_existing_sidecars {
            self.merge_existing_sidecars = false;
        }
        if cli.no_delete_duplicate_sidecar {
            self.delete_duplicate_sidecars = false;
        }
        if cli.no_exclude_sidecar {
            self.exclude_sidecars = false;
        }
        if let Some(path) = &cli.jdupes_path {
            self.jdupes_path = path.clone();
        }
        if let Some(db) = &cli.jdupes_hash_db {
            self.jdupes_hash_db = Some(db.clone());
        }
        if !cli.jdupes_args.is_empty() {
            self.jdupes_extra_args = cli.jdupes_args.clone();
        }
        if let Some(output) = &cli.output {
            self.dry_run_output = output.clone();
        }
        if cli.trash {
            self.delete_mode = DeleteMode::Trash;
        }
        if cli.progress {
            self.show_progress = true;
        }
    }

    /// The validated sidecar extension.
    ///
    /// # Errors
    ///
    /// Returns `Sidecar` if the extension is empty after stripping dots.
    pub fn sidecar_extension(&self) -> Result<SidecarExtension, ConfigError> {
        Ok(SidecarExtension::new(&self.sidecar_extension)?)
    }

    /// Resolver options for this configuration.
    #[must_use]
    pub fn resolve_options(&self, dry_run: bool) -> ResolveOptions {
        ResolveOptions::default()
            .with_dry_run(dry_run)
            .with_merge_sidecars(self.merge_existing_sidecars)
            .with_delete_sidecars(self.delete_duplicate_sidecars)
            .with_delete_mode(self.delete_mode)
    }

    /// jdupes invocation settings for this configuration.
    ///
    /// # Errors
    ///
    /// Returns `Sidecar` if the extension is invalid.
    pub fn scanner_config(&self, passthrough_stderr: bool) -> Result<ScannerConfig, ConfigError> {
        let exclude_extension = if self.exclude_sidecars {
            Some(self.sidecar_extension()?)
        } else {
            None
        };
        Ok(ScannerConfig {
            program: self.jdupes_path.clone(),
            hash_db: self.jdupes_hash_db.clone(),
            exclude_extension,
            extra_args: self.jdupes_extra_args.clone(),
            passthrough_stderr,
        })
    }
}

/// Keys in the file at `path` that are not configuration fields, each with
/// the closest known key when one is similar enough.
#[must_use]
pub fn unknown_keys(path: &Path) -> Vec<(String, Option<&'static str>)> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        // Reported by the real parse
        return Vec::new();
    };

    table
        .keys()
        .filter(|k| !KNOWN_KEYS.contains(&k.as_str()))
        .map(|k| (k.clone(), suggest_key(k)))
        .collect()
}

fn suggest_key(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, strsim::jaro_winkler(key, known)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}

fn warn_unknown_keys(path: &Path) {
    for (key, suggestion) in unknown_keys(path) {
        match suggestion {
            Some(s) => log::warn!(
                "Unknown config key '{}' in {}; did you mean '{}'?",
                key,
                path.display(),
                s
            ),
            None => log::warn!("Unknown config key '{}' in {}", key, path.display()),
        }
    }
}
