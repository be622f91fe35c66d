//! Error types for manifest-check
//!
//! There are two top-level kinds of trouble: expected failures (the
//! project is not a Python package, nothing is under version control,
//! and so on) and failures of commands we shell out to. Both are
//! reported as a clean diagnostic at the binary boundary; warnings
//! that do not stop the run are reported through [`crate::ui`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for manifest-check operations
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("This is not a Python project (no setup.py or pyproject.toml).")]
    NotAPythonProject,

    #[error("Couldn't find version control data (git/hg/bzr/svn supported)")]
    NoVersionControl,

    #[error("There are no files added to version control!")]
    NoFilesTracked,

    #[error("Unrecognized archive type: {path}")]
    UnrecognizedArchive { path: PathBuf },

    #[error("Could not read archive {path}: {reason}")]
    ArchiveRead { path: PathBuf, reason: String },

    #[error("No files found in {dir}")]
    NoFilesInDir { dir: PathBuf },

    #[error("More than one file exists in {dir}:\n{files}")]
    MultipleFilesInDir { dir: PathBuf, files: String },

    #[error("File doesn't have the common prefix ({prefix}): {name}")]
    BadPrefix { prefix: String, name: String },

    /// A shelled-out command exited with a non-zero status.
    #[error("{command} failed (status {status}):\n{output}")]
    CommandFailed {
        command: String,
        status: i32,
        output: String,
    },

    /// A shelled-out command could not be started at all.
    #[error("could not run {command}: {reason}")]
    CommandNotFound { command: String, reason: String },

    #[error("could not parse svn status output: {reason}")]
    SvnStatusParse { reason: String },

    #[error("could not parse {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckError {
    /// Create an unrecognized archive error
    pub fn unrecognized_archive(path: impl Into<PathBuf>) -> Self {
        Self::UnrecognizedArchive { path: path.into() }
    }

    /// Create an archive read error
    pub fn archive_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ArchiveRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a bad common prefix error
    pub fn bad_prefix(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self::BadPrefix {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// Create a command failed error from an argv and its captured output
    pub fn command_failed(command: &[&str], status: i32, output: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.join(" "),
            status,
            output: output.into(),
        }
    }

    /// Create a command not found error
    pub fn command_not_found(command: &[&str], reason: impl ToString) -> Self {
        Self::CommandNotFound {
            command: command.join(" "),
            reason: reason.to_string(),
        }
    }

    /// Create an svn status parse error
    pub fn svn_status_parse(reason: impl Into<String>) -> Self {
        Self::SvnStatusParse {
            reason: reason.into(),
        }
    }

    /// Create a configuration parse error
    pub fn config_parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ConfigParse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for manifest-check operations
pub type Result<T> = std::result::Result<T, CheckError>;
