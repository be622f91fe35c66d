//! Filesystem and process utilities
//!
//! Everything here is strictly synchronous: external commands block
//! until they finish, with no timeout. The two guards ([`Chdir`] and
//! [`ScratchDir`]) restore their resource on every exit path, including
//! early returns and panics, so the engine can change the process
//! working directory and create temporary directories without leaking
//! either.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{CheckError, Result};

/// Run a command, returning its combined stdout and stderr.
///
/// A command that cannot be started at all (typically: not installed) is
/// reported as [`CheckError::CommandNotFound`]; a non-zero exit becomes
/// [`CheckError::CommandFailed`] carrying the captured output.
pub fn run(command: &[&str], cwd: Option<&Path>, env: &[(&str, &str)]) -> Result<String> {
    debug!(?command, ?cwd, "running command");
    let mut cmd = Command::new(command[0]);
    cmd.args(&command[1..]).stdin(Stdio::null());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    for (key, value) in env {
        cmd.env(key, value);
    }
    let output = cmd
        .output()
        .map_err(|e| CheckError::command_not_found(command, e))?;
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    if !output.status.success() {
        return Err(CheckError::command_failed(
            command,
            output.status.code().unwrap_or(-1),
            text,
        ));
    }
    Ok(text)
}

/// Change the current working directory until the guard is dropped.
///
/// The process working directory is global mutable state; keeping the
/// enter/restore strictly paired is what makes the engine safe to call
/// repeatedly from one process.
#[derive(Debug)]
pub struct Chdir {
    previous: PathBuf,
}

impl Chdir {
    pub fn enter(dir: &Path) -> Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir)?;
        debug!(dir = %dir.display(), "entered directory");
        Ok(Self { previous })
    }
}

impl Drop for Chdir {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            debug!(error = %e, "could not restore working directory");
        }
    }
}

/// A temporary directory removed on drop.
///
/// Removal goes through [`rmtree`] rather than a plain recursive delete:
/// sdist builds can leave read-only files behind, and the stock removal
/// primitive fails outright on those.
#[derive(Debug)]
pub struct ScratchDir {
    dir: tempfile::TempDir,
}

impl ScratchDir {
    /// Create a temporary directory named `manifest-check-*<hint>`.
    pub fn new(hint: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("manifest-check-")
            .suffix(hint)
            .tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        // TempDir's own drop gives up on read-only entries; remove the
        // tree ourselves first and let it find nothing left to do.
        if let Err(e) = rmtree(self.dir.path()) {
            debug!(path = %self.dir.path().display(), error = %e, "could not remove scratch directory");
        }
    }
}

/// Recursively remove a directory, relaxing read-only permissions first.
pub fn rmtree(path: &Path) -> std::io::Result<()> {
    for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
        if let Ok(metadata) = entry.metadata() {
            let mut permissions = metadata.permissions();
            if permissions.readonly() {
                make_writable(&mut permissions, metadata.is_dir());
                let _ = fs::set_permissions(entry.path(), permissions);
            }
        }
    }
    fs::remove_dir_all(path)
}

#[cfg(unix)]
fn make_writable(permissions: &mut fs::Permissions, is_dir: bool) {
    use std::os::unix::fs::PermissionsExt;
    // directories additionally need +x to descend into them
    let bits = if is_dir { 0o700 } else { 0o600 };
    permissions.set_mode(permissions.mode() | bits);
}

#[cfg(not(unix))]
fn make_writable(permissions: &mut fs::Permissions, _is_dir: bool) {
    permissions.set_readonly(false);
}

/// Copy a list of files into `destdir`, preserving directory structure.
/// Names must be relative to the current working directory.
pub fn copy_files<S: AsRef<str>>(filelist: &[S], destdir: &Path) -> Result<()> {
    for name in filelist {
        let name = name.as_ref();
        let destfile = destdir.join(name);
        if Path::new(name).is_dir() {
            fs::create_dir_all(&destfile)?;
        } else {
            if let Some(parent) = destfile.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(name, &destfile)?;
        }
    }
    Ok(())
}

/// Return the path of the one file in a directory.
///
/// The sdist build contract is "exactly one archive appears in the
/// output directory"; zero or several files is an error worth naming.
pub fn get_one_file_in(dir: &Path) -> Result<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    match entries.len() {
        0 => Err(CheckError::NoFilesInDir {
            dir: dir.to_path_buf(),
        }),
        1 => Ok(entries.remove(0)),
        _ => Err(CheckError::MultipleFilesInDir {
            dir: dir.to_path_buf(),
            files: entries
                .iter()
                .map(|p| p.file_name().unwrap_or_default().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("\n"),
        }),
    }
}
