//! Version-control adapters
//!
//! Four systems are supported: Git, Mercurial, Bazaar and Subversion.
//! The set is closed and small, so dispatch is a plain enum selected by
//! an ordered filesystem probe, walking up parent directories until a
//! metadata marker is found.

mod bzr;
mod git;
mod hg;
mod svn;

use std::path::Path;

use tracing::debug;

use crate::error::{CheckError, Result};
use crate::ui::Reporter;

/// One of the supported version-control systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vcs {
    Git,
    Mercurial,
    Bazaar,
    Subversion,
}

impl Vcs {
    pub const ALL: [Vcs; 4] = [Vcs::Git, Vcs::Mercurial, Vcs::Bazaar, Vcs::Subversion];

    pub fn name(self) -> &'static str {
        match self {
            Vcs::Git => "git",
            Vcs::Mercurial => "hg",
            Vcs::Bazaar => "bzr",
            Vcs::Subversion => "svn",
        }
    }

    /// Does this VCS have its metadata marker in `dir`?
    fn probe(self, dir: &Path) -> bool {
        match self {
            // .git can be a file for submodule checkouts
            Vcs::Git => dir.join(".git").exists(),
            Vcs::Mercurial => dir.join(".hg").is_dir(),
            Vcs::Bazaar => dir.join(".bzr").is_dir(),
            Vcs::Subversion => dir.join(".svn").is_dir(),
        }
    }

    /// Probe all adapters at one location, in order.
    pub fn detect_at(dir: &Path) -> Option<Vcs> {
        Self::ALL.into_iter().find(|vcs| vcs.probe(dir))
    }

    /// Detect the version control system used for a directory, walking
    /// up through its ancestors.
    pub fn detect(start: &Path) -> Result<Vcs> {
        let mut location = dunce::canonicalize(start)?;
        loop {
            if let Some(vcs) = Self::detect_at(&location) {
                debug!(vcs = vcs.name(), at = %location.display(), "detected version control");
                return Ok(vcs);
            }
            if !location.pop() {
                return Err(CheckError::NoVersionControl);
            }
        }
    }

    /// List all files under version control, relative to the current
    /// directory (which must be the project root).
    pub fn versioned_files(self, ui: &mut Reporter) -> Result<Vec<String>> {
        match self {
            Vcs::Git => git::versioned_files(),
            Vcs::Mercurial => hg::versioned_files(),
            Vcs::Bazaar => bzr::versioned_files(),
            Vcs::Subversion => svn::versioned_files(ui),
        }
    }
}
