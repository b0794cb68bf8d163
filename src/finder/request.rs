//! Finder invocation requests and argument construction.
//!
//! A [`FinderRequest`] captures one user-initiated scan. It is validated once
//! at construction and never mutated afterwards; the orchestrator only reads
//! it to build the external finder's command line.
//!
//! # Argument Order
//!
//! The external finder parses a fixed CLI contract, so [`FinderRequest::to_args`]
//! always emits, in this order:
//!
//! 1. every directory, positionally, in the order supplied
//! 2. `-r` when recursive
//! 3. `--hash-algorithm <name>` when an algorithm is set
//! 4. `-o <path>` when a report file is requested
//!
//! # Example
//!
//! ```
//! use dupeshell::finder::FinderRequest;
//! use std::ffi::OsString;
//!
//! let request = FinderRequest::new(vec!["/a".into(), "/b".into()])
//!     .unwrap()
//!     .with_recursive(true)
//!     .with_hash_algorithm("sha256")
//!     .unwrap();
//!
//! let args: Vec<OsString> = request.to_args();
//! assert_eq!(args, ["/a", "/b", "-r", "--hash-algorithm", "sha256"]);
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Flag enabling recursive traversal in the external finder.
pub const RECURSIVE_FLAG: &str = "-r";

/// Flag selecting the external finder's hash function.
pub const HASH_ALGORITHM_FLAG: &str = "--hash-algorithm";

/// Flag asking the external finder to write a deletion-candidate report.
pub const OUTPUT_FILE_FLAG: &str = "-o";

/// Hash algorithms the bundled finder script accepts.
///
/// Only used for suggestions; the request itself forwards any name verbatim.
pub const KNOWN_HASH_ALGORITHMS: &[&str] = &["md5", "sha1", "sha256"];

/// Errors raised while building a [`FinderRequest`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// No directories were supplied.
    #[error("at least one directory is required")]
    NoDirectories,

    /// A directory entry was an empty path.
    #[error("directory #{0} is an empty path")]
    EmptyPath(usize),

    /// The hash algorithm name was blank.
    #[error("hash algorithm name cannot be empty")]
    EmptyHashAlgorithm,
}

/// One invocation of the external duplicate finder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderRequest {
    directories: Vec<PathBuf>,
    recursive: bool,
    hash_algorithm: Option<String>,
    output_file: Option<PathBuf>,
}

impl FinderRequest {
    /// Create a request over the given directories.
    ///
    /// Directory existence is left to the external finder; only the shape of
    /// the list is checked here.
    ///
    /// # Errors
    ///
    /// - `NoDirectories` if `directories` is empty
    /// - `EmptyPath` if any entry is an empty path (1-based index)
    pub fn new(directories: Vec<PathBuf>) -> Result<Self, RequestError> {
        if directories.is_empty() {
            return Err(RequestError::NoDirectories);
        }
        if let Some(index) = directories
            .iter()
            .position(|dir| dir.as_os_str().is_empty())
        {
            return Err(RequestError::EmptyPath(index + 1));
        }

        Ok(Self {
            directories,
            recursive: false,
            hash_algorithm: None,
            output_file: None,
        })
    }

    /// Enable or disable recursive scanning.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Select the hash function the finder should use.
    ///
    /// # Errors
    ///
    /// Returns `EmptyHashAlgorithm` if `name` is blank.
    pub fn with_hash_algorithm(mut self, name: impl Into<String>) -> Result<Self, RequestError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RequestError::EmptyHashAlgorithm);
        }
        self.hash_algorithm = Some(trimmed.to_string());
        Ok(self)
    }

    /// Ask the finder to write its deletion candidates to `path`.
    #[must_use]
    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Directories to scan, in the order they were supplied.
    #[must_use]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Whether the finder should descend into subdirectories.
    #[must_use]
    pub fn recursive(&self) -> bool {
        self.recursive
    }

    /// The selected hash function, if any.
    #[must_use]
    pub fn hash_algorithm(&self) -> Option<&str> {
        self.hash_algorithm.as_deref()
    }

    /// The report file the finder should write, if any.
    #[must_use]
    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    /// Build the finder's argument list.
    #[must_use]
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self
            .directories
            .iter()
            .map(|dir| dir.as_os_str().to_os_string())
            .collect();

        if self.recursive {
            args.push(RECURSIVE_FLAG.into());
        }
        if let Some(ref algorithm) = self.hash_algorithm {
            args.push(HASH_ALGORITHM_FLAG.into());
            args.push(algorithm.into());
        }
        if let Some(ref output) = self.output_file {
            args.push(OUTPUT_FILE_FLAG.into());
            args.push(output.as_os_str().to_os_string());
        }

        args
    }
}

/// Suggest the closest known hash algorithm for an unrecognized name.
///
/// Returns `None` when `name` is already known or nothing is close enough.
///
/// ```
/// use dupeshell::finder::request::suggest_hash_algorithm;
///
/// assert_eq!(suggest_hash_algorithm("sha265"), Some("sha256"));
/// assert_eq!(suggest_hash_algorithm("md5"), None);
/// ```
#[must_use]
pub fn suggest_hash_algorithm(name: &str) -> Option<&'static str> {
    let lowered = name.to_ascii_lowercase();
    if KNOWN_HASH_ALGORITHMS.contains(&lowered.as_str()) {
        return None;
    }

    KNOWN_HASH_ALGORITHMS
        .iter()
        .map(|known| (*known, strsim::jaro_winkler(&lowered, known)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}
