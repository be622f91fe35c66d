//! Git adapter

use std::env;
use std::path::Path;

use crate::error::Result;
use crate::paths::add_prefix_to_each;
use crate::util::run;

/// List all files versioned by git in the current directory, including
/// the contents of nested submodules (prefixed with their path).
pub fn versioned_files() -> Result<Vec<String>> {
    let mut files = ls_files(None)?;
    for subdir in list_submodules()? {
        let subdir = relative_to_cwd(&subdir)?;
        let sub_files = ls_files(Some(Path::new(&subdir)))?;
        files.extend(add_prefix_to_each(&subdir, &sub_files));
    }
    Ok(files)
}

fn ls_files(cwd: Option<&Path>) -> Result<Vec<String>> {
    let output = run(&["git", "ls-files", "-z"], cwd, &[])?;
    Ok(output
        .split('\0')
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect())
}

/// List nested submodule directories as absolute paths.
///
/// `git submodule foreach` is expensive even when there are no
/// submodules at all, so it only runs when .gitmodules exists.
fn list_submodules() -> Result<Vec<String>> {
    if !Path::new(".gitmodules").exists() {
        return Ok(Vec::new());
    }
    let output = run(
        &[
            "git",
            "submodule",
            "--quiet",
            "foreach",
            "--recursive",
            r#"printf "%s/%s\n" $toplevel $path"#,
        ],
        None,
        &[],
    )?;
    Ok(output
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

fn relative_to_cwd(path: &str) -> Result<String> {
    let cwd = env::current_dir()?;
    let relative = Path::new(path)
        .strip_prefix(&cwd)
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|_| Path::new(path).to_path_buf());
    Ok(relative.to_string_lossy().replace('\\', "/"))
}
