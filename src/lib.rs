//! manifest-check - completeness checking for Python sdists
//!
//! manifest-check verifies that a version-controlled Python project and
//! its built source-distribution archive contain the same set of files,
//! flagging discrepancies and suggesting MANIFEST.in rules to fix them.
//!
//! # How it works
//!
//! The tool lists the files under version control (git, hg, bzr and svn
//! are supported), builds an sdist and compares the two lists. Because
//! setuptools plugins and stale egg-info metadata can make that first
//! comparison lie, the versioned files are also copied into a scratch
//! directory and the sdist is built a second time from that clean copy.
//!
//! # Example
//!
//! ```rust,no_run
//! use manifest_check::{check, CheckOptions};
//!
//! let options = CheckOptions {
//!     source_tree: "./my-project".into(),
//!     ..CheckOptions::default()
//! };
//! let ok = check(&options)?;
//! # Ok::<(), manifest_check::CheckError>(())
//! ```

pub mod archive;
pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod paths;
pub mod pattern;
pub mod rules;
pub mod suggest;
pub mod ui;
pub mod util;
pub mod vcs;

// Re-export commonly used types
pub use check::{check, check_with_builder, is_package, CheckOptions, PythonSdist, SdistBuilder};
pub use error::{CheckError, Result};
pub use rules::{IgnoreList, RuleSpec};

/// Current version of manifest-check
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
