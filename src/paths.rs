//! Path canonicalization
//!
//! File lists arrive from very different places (VCS listings, zip and
//! tar archives) with different separator conventions, and most tools
//! only report files, not the directories containing them. Everything is
//! funnelled through [`canonicalize`], which produces the one comparable
//! form used by the rest of the engine: forward slashes, NFC-normalized
//! on macOS, ancestor directories synthesized, duplicates removed,
//! sorted.

use std::collections::BTreeSet;

use crate::error::{CheckError, Result};

/// Normalize a single file name.
///
/// Some VCS print directory names with trailing slashes, tools on
/// Windows may print backslash separators, and macOS filesystems store
/// decomposed Unicode that does not compare equal to the composed form
/// a VCS prints.
pub fn normalize_name(name: &str) -> String {
    // only the platform separator is rewritten; on Unix a backslash is
    // a legal filename character
    #[cfg(windows)]
    let name = name.replace('\\', "/");
    let mut parts: Vec<&str> = Vec::new();
    for part in name.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(&p) if p != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            _ => parts.push(part),
        }
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        nfc(parts.join("/"))
    }
}

#[cfg(target_os = "macos")]
fn nfc(name: String) -> String {
    use unicode_normalization::UnicodeNormalization;
    name.nfc().collect()
}

#[cfg(not(target_os = "macos"))]
fn nfc(name: String) -> String {
    name
}

/// Normalize a list of names into the canonical comparable form.
///
/// Git, Mercurial and zip files omit directory entries, so every ancestor
/// of a listed file is added back. The result is duplicate-free and
/// sorted; the project root itself (`.`) is never included. The operation
/// is idempotent.
pub fn canonicalize<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for name in names {
        let name = normalize_name(name.as_ref());
        if name == "." {
            continue;
        }
        let mut ancestor = name.as_str();
        while let Some(pos) = ancestor.rfind('/') {
            ancestor = &ancestor[..pos];
            if seen.contains(ancestor) {
                break;
            }
            seen.insert(ancestor.to_string());
        }
        seen.insert(name);
    }
    seen.into_iter().collect()
}

/// Strip the single common top-level directory from an archive listing.
///
/// Archive builders conventionally wrap everything in `name-version/`.
/// The prefix is taken from the first entry; any entry that does not
/// share it is an error.
pub fn strip_toplevel_name(filelist: &[String]) -> Result<Vec<String>> {
    let first = match filelist.first() {
        Some(first) => first,
        None => return Ok(Vec::new()),
    };
    let (prefix, names) = match first.split_once('/') {
        Some((top, _)) => (format!("{}/", top), filelist),
        None => (format!("{}/", first), &filelist[1..]),
    };
    let mut stripped = Vec::with_capacity(names.len());
    for name in names {
        match name.strip_prefix(&prefix) {
            Some(rest) => stripped.push(rest.to_string()),
            None => return Err(CheckError::bad_prefix(prefix, name.clone())),
        }
    }
    Ok(stripped)
}

/// Add a directory prefix to each name in a file list.
pub fn add_prefix_to_each(prefix: &str, filelist: &[String]) -> Vec<String> {
    filelist
        .iter()
        .map(|name| format!("{}/{}", prefix, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("a/b/"), "a/b");
        assert_eq!(normalize_name("./a/./b"), "a/b");
        assert_eq!(normalize_name("a/b/../c"), "a/c");
        assert_eq!(normalize_name("."), ".");
    }

    #[test]
    #[cfg(windows)]
    fn test_normalize_name_rewrites_platform_separators() {
        assert_eq!(normalize_name("a\\b"), "a/b");
    }

    #[test]
    #[cfg(not(windows))]
    fn test_normalize_name_keeps_backslash_filenames() {
        assert_eq!(normalize_name("a\\b"), "a\\b");
    }

    #[test]
    fn test_canonicalize_synthesizes_ancestors() {
        assert_eq!(
            canonicalize(["a/b", "a/c", "a/c/d"]),
            vec!["a", "a/b", "a/c", "a/c/d"]
        );
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let once = canonicalize(["zoo/photos/cat.png", "README.rst", "zoo"]);
        let twice = canonicalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_canonicalize_empty_and_toplevel() {
        assert_eq!(canonicalize(Vec::<String>::new()), Vec::<String>::new());
        assert_eq!(canonicalize(["setup.py"]), vec!["setup.py"]);
    }

    #[test]
    fn test_canonicalize_dedups_and_sorts() {
        assert_eq!(
            canonicalize(["b.txt", "a.txt", "b.txt", "a/x"]),
            vec!["a", "a.txt", "a/x", "b.txt"]
        );
    }

    #[test]
    fn test_strip_toplevel_name() {
        let with_top: Vec<String> = ["a", "a/b", "a/c", "a/c/d"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            strip_toplevel_name(&with_top).unwrap(),
            vec!["b", "c", "c/d"]
        );
        let without_top: Vec<String> = ["a/b", "a/c", "a/c/d"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            strip_toplevel_name(&without_top).unwrap(),
            vec!["b", "c", "c/d"]
        );
        assert_eq!(strip_toplevel_name(&[]).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_strip_toplevel_name_rejects_odd_entries() {
        let list: Vec<String> = ["a/b", "c/d"].iter().map(|s| s.to_string()).collect();
        let err = strip_toplevel_name(&list).unwrap_err();
        assert!(err.to_string().contains("common prefix"));
    }

    #[test]
    fn test_add_prefix_to_each() {
        let list: Vec<String> = ["a", "b", "c/d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            add_prefix_to_each("foo/bar", &list),
            vec!["foo/bar/a", "foo/bar/b", "foo/bar/c/d"]
        );
    }
}
