//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `config.toml` (explicit `--config` path, or the platform config dir)
//! 3. `DUPESHELL_*` environment variables
//! 4. CLI flags, applied by the caller through [`Config::apply_scan_overrides`]
//!
//! # Example
//!
//! ```toml
//! interpreter = "python3.12"
//! mode = "development"
//! app_root = "/home/me/src/dupe-gui"
//! timeout_secs = 600
//! hash_algorithm = "sha256"
//! recursive = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::finder::resolve::{resolve_interpreter, LaunchMode, Platform, ScriptLocator};
use crate::finder::FinderCommand;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DUPESHELL_";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interpreter command; defaults to the platform table entry.
    pub interpreter: Option<String>,
    /// Explicit finder script path; bypasses `mode`.
    pub script: Option<PathBuf>,
    /// Where to look for the finder script.
    pub mode: LaunchMode,
    /// Packaged resources directory.
    pub resources_dir: Option<PathBuf>,
    /// Application root used in development mode.
    pub app_root: Option<PathBuf>,
    /// Kill the finder after this many seconds.
    pub timeout_secs: Option<u64>,
    /// Default hash algorithm passed to the finder.
    pub hash_algorithm: Option<String>,
    /// Scan recursively unless told otherwise.
    pub recursive: bool,
}

/// CLI values that override loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct ScanOverrides {
    pub interpreter: Option<String>,
    pub script: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub hash_algorithm: Option<String>,
    pub recursive: bool,
}

impl Config {
    /// Load configuration from defaults, file, and environment.
    ///
    /// With `path` set the file must exist; otherwise the platform default
    /// location is used when present.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any layer fails to
    /// parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match path {
            Some(explicit) => {
                if !explicit.is_file() {
                    anyhow::bail!("Config file not found: {}", explicit.display());
                }
                figment = figment.merge(Toml::file(explicit));
            }
            None => {
                if let Some(default) = Self::default_path().filter(|p| p.is_file()) {
                    log::debug!("Loading config from {}", default.display());
                    figment = figment.merge(Toml::file(default));
                }
            }
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extract a config from an assembled figment.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid key.
    pub fn extract(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .context("Invalid configuration")
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupeshell", "dupeshell")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply CLI flags on top of the loaded layers.
    pub fn apply_scan_overrides(&mut self, overrides: ScanOverrides) {
        if overrides.interpreter.is_some() {
            self.interpreter = overrides.interpreter;
        }
        if overrides.script.is_some() {
            self.script = overrides.script;
        }
        if overrides.timeout_secs.is_some() {
            self.timeout_secs = overrides.timeout_secs;
        }
        if overrides.hash_algorithm.is_some() {
            self.hash_algorithm = overrides.hash_algorithm;
        }
        // A flag can only turn recursion on.
        self.recursive |= overrides.recursive;
    }

    /// Interpreter command after applying the platform default.
    #[must_use]
    pub fn interpreter(&self) -> String {
        self.interpreter
            .clone()
            .unwrap_or_else(|| resolve_interpreter(Platform::current()).to_string())
    }

    /// Finder timeout, if any. Zero disables it.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    #[must_use]
    pub fn script_locator(&self) -> ScriptLocator {
        ScriptLocator {
            script: self.script.clone(),
            mode: self.mode,
            resources_dir: self.resources_dir.clone(),
            app_root: self.app_root.clone(),
        }
    }

    /// Resolve the full finder command (interpreter + script).
    ///
    /// # Errors
    ///
    /// Returns an error if a default script location cannot be determined.
    pub fn finder_command(&self) -> Result<FinderCommand> {
        let script = self
            .script_locator()
            .locate()
            .context("Failed to determine finder script location")?;
        Ok(FinderCommand::script(self.interpreter(), script))
    }
}
