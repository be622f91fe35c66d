//! Bazaar adapter

use crate::error::Result;
use crate::util::run;

/// List all files versioned in Bazaar in the current directory.
///
/// `bzr ls -VR` does not report files that were deleted from disk but
/// not unregistered; a known, accepted limitation.
pub fn versioned_files() -> Result<Vec<String>> {
    let output = run(&["bzr", "ls", "-VR"], None, &[])?;
    Ok(output
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}
