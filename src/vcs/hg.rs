//! Mercurial adapter

use crate::error::Result;
use crate::util::run;

/// List all files under Mercurial control in the current directory.
///
/// The status letters cover normal, clean, added, modified and deleted
/// files; deleted-but-still-tracked files are listed on purpose, so that
/// stale working copies surface as "missing from disk" warnings later.
pub fn versioned_files() -> Result<Vec<String>> {
    let output = run(&["hg", "status", "-ncamd", "."], None, &[])?;
    Ok(output
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}
