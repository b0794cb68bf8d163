//! Locating the finder script and the interpreter that runs it.
//!
//! The script lives in one of two places:
//!
//! - **Packaged**: shipped next to the binary in a resources directory
//! - **Development**: one level above the application root in a source checkout
//!
//! Which one applies is decided by [`LaunchMode`], normally `Auto`, which maps
//! release builds to `Packaged` and debug builds to `Development`. An explicit
//! script path bypasses both.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the external finder script.
pub const FINDER_SCRIPT_NAME: &str = "duplicate_finder.py";

/// Directory, relative to the executable, that holds packaged resources.
pub const RESOURCES_DIR_NAME: &str = "resources";

/// Interpreter used when the platform has no table entry.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Target platform, as far as interpreter naming is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }
}

const INTERPRETERS: &[(Platform, &str)] = &[
    (Platform::Windows, "python"),
    (Platform::MacOs, "python3"),
    (Platform::Linux, "python3"),
];

/// Interpreter command for running the finder script on `platform`.
///
/// ```
/// use dupeshell::finder::resolve::{resolve_interpreter, Platform};
///
/// assert_eq!(resolve_interpreter(Platform::Windows), "python");
/// assert_eq!(resolve_interpreter(Platform::Linux), "python3");
/// ```
#[must_use]
pub fn resolve_interpreter(platform: Platform) -> &'static str {
    INTERPRETERS
        .iter()
        .find(|(p, _)| *p == platform)
        .map_or(DEFAULT_INTERPRETER, |(_, cmd)| *cmd)
}

/// Where to look for the finder script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Pick based on the build profile.
    #[default]
    Auto,
    /// Script ships in the resources directory next to the binary.
    Packaged,
    /// Script sits one level above the application root.
    Development,
}

impl LaunchMode {
    /// Resolve `Auto` to a concrete mode.
    #[must_use]
    pub fn effective(self) -> Self {
        match self {
            Self::Auto if cfg!(debug_assertions) => Self::Development,
            Self::Auto => Self::Packaged,
            other => other,
        }
    }
}

impl std::fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Packaged => write!(f, "packaged"),
            Self::Development => write!(f, "development"),
        }
    }
}

/// Inputs for locating the finder script.
#[derive(Debug, Clone, Default)]
pub struct ScriptLocator {
    /// Explicit script path; wins over everything else.
    pub script: Option<PathBuf>,
    pub mode: LaunchMode,
    /// Packaged resources directory (default: `<exe dir>/resources`).
    pub resources_dir: Option<PathBuf>,
    /// Application root for development mode (default: current directory).
    pub app_root: Option<PathBuf>,
}

impl ScriptLocator {
    /// Compute the script path.
    ///
    /// # Errors
    ///
    /// Fails only when a default directory is needed and cannot be
    /// determined (current executable or working directory unavailable).
    pub fn locate(&self) -> std::io::Result<PathBuf> {
        if let Some(ref script) = self.script {
            return Ok(script.clone());
        }

        match self.mode.effective() {
            LaunchMode::Packaged => {
                let resources = match self.resources_dir {
                    Some(ref dir) => dir.clone(),
                    None => default_resources_dir()?,
                };
                Ok(packaged_script_path(&resources))
            }
            _ => {
                let root = match self.app_root {
                    Some(ref root) => root.clone(),
                    None => std::env::current_dir()?,
                };
                Ok(development_script_path(&root))
            }
        }
    }
}

/// Script location inside a packaged resources directory.
#[must_use]
pub fn packaged_script_path(resources_dir: &Path) -> PathBuf {
    resources_dir.join(FINDER_SCRIPT_NAME)
}

/// Script location relative to a development application root.
#[must_use]
pub fn development_script_path(app_root: &Path) -> PathBuf {
    app_root.join("..").join(FINDER_SCRIPT_NAME)
}

fn default_resources_dir() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok(dir.join(RESOURCES_DIR_NAME))
}

/// A fully resolved program plus the arguments that precede request arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderCommand {
    pub program: OsString,
    pub leading_args: Vec<OsString>,
}

impl FinderCommand {
    /// Run `script` with `interpreter`.
    #[must_use]
    pub fn script(interpreter: impl Into<OsString>, script: impl Into<PathBuf>) -> Self {
        Self {
            program: interpreter.into(),
            leading_args: vec![script.into().into_os_string()],
        }
    }

    /// Run an arbitrary program with fixed leading arguments.
    #[must_use]
    pub fn new<I, S>(program: impl Into<OsString>, leading_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            leading_args: leading_args.into_iter().map(Into::into).collect(),
        }
    }

    /// Human-readable command line, for logs.
    #[must_use]
    pub fn display_with(&self, args: &[OsString]) -> String {
        std::iter::once(&self.program)
            .chain(self.leading_args.iter())
            .chain(args.iter())
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
