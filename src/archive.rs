//! Distribution archive reading
//!
//! Exactly two container formats are supported: zip, and tar (plain or
//! gzip/bzip2-compressed). Anything else is a hard failure: an sdist
//! build that produces some other format is a problem worth reporting,
//! not tolerating.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CheckError, Result};

/// Return the list of entry names in an archive, trailing slashes
/// stripped. Directory synthesis, sorting and deduplication are the
/// caller's job (via [`crate::paths::canonicalize`]).
pub fn file_list(archive: &Path) -> Result<Vec<String>> {
    let name = archive.to_string_lossy();
    if name.ends_with(".zip") {
        zip_file_list(archive)
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        let file = File::open(archive)?;
        tar_file_list(flate2::read::GzDecoder::new(file))
    } else if name.ends_with(".tar.bz2") {
        let file = File::open(archive)?;
        tar_file_list(bzip2::read::BzDecoder::new(file))
    } else if name.ends_with(".tar") {
        tar_file_list(File::open(archive)?)
    } else {
        Err(CheckError::unrecognized_archive(archive))
    }
}

fn zip_file_list(archive: &Path) -> Result<Vec<String>> {
    let file = File::open(archive)?;
    let zip = zip::ZipArchive::new(file).map_err(|e| CheckError::archive_read(archive, e))?;
    Ok(zip
        .file_names()
        .map(|name| name.trim_end_matches('/').to_string())
        .collect())
}

fn tar_file_list<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut tar = tar::Archive::new(reader);
    let mut names = Vec::new();
    for entry in tar.entries()? {
        let entry = entry?;
        let path = entry.path()?;
        names.push(path.to_string_lossy().trim_end_matches('/').to_string());
    }
    Ok(names)
}

/// Extract the version number from an sdist filename
/// (`pkg-1.2.3.tar.gz` → `1.2.3`).
pub fn extract_version_from_filename(filename: &Path) -> String {
    let base = filename
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = base.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(&base);
    let stem = stem.strip_suffix(".tar").unwrap_or(stem);
    stem.split_once('-')
        .map(|(_, version)| version)
        .unwrap_or_default()
        .to_string()
}
