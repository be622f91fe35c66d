//! MANIFEST.in template parsing
//!
//! The packaging manifest template already tells us which files the
//! maintainer decided to leave out of the sdist, so its exclusion
//! directives are folded into the effective ignore list. Only the four
//! exclusion keywords are modeled; `include`, `global-include`,
//! `recursive-include` and `graft` can re-include previously excluded
//! files in the real template grammar, but are deliberately skipped here
//! (a known incompleteness, kept for parity with the absent re-include
//! ordering in the rule engine).

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::rules::IgnoreList;

/// Conventional location of the manifest template in the project root.
pub const MANIFEST_FILENAME: &str = "MANIFEST.in";

/// Read a manifest template into logical lines: comments stripped,
/// blanks skipped, backslash-continued lines joined, whitespace trimmed.
pub fn read_template_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(logical_lines(&content))
}

fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = String::new();
    for raw in content.lines() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let line = line.trim();
        if let Some(joined) = line.strip_suffix('\\') {
            pending.push_str(joined.trim_end());
            pending.push(' ');
            continue;
        }
        pending.push_str(line);
        let logical = std::mem::take(&mut pending);
        let logical = logical.trim().to_string();
        if !logical.is_empty() {
            lines.push(logical);
        }
    }
    // a trailing backslash on the last line still yields a line
    let leftover = pending.trim().to_string();
    if !leftover.is_empty() {
        lines.push(leftover);
    }
    lines
}

/// Gather the ignore rules declared by manifest-template lines.
///
/// Returns the rules plus any non-fatal warnings: malformed
/// `recursive-exclude` lines are skipped, and leading or trailing path
/// separators in directive arguments behave inconsistently across
/// operating systems.
pub fn parse_lines(lines: &[String]) -> (IgnoreList, Vec<String>) {
    let mut rules = IgnoreList::new();
    let mut warnings = Vec::new();
    for line in lines {
        let mut words = line.split_whitespace();
        let cmd = match words.next() {
            Some(cmd) => cmd,
            None => continue,
        };
        let args: Vec<&str> = words.collect();
        if args.is_empty() {
            // no arguments, so not interesting
            continue;
        }
        for arg in &args {
            if arg.starts_with('/') || arg.starts_with('\\') {
                warnings.push(format!(
                    "ERROR: Leading slashes are not allowed in MANIFEST.in on Windows: {}",
                    arg
                ));
            }
            if arg.ends_with('/') || arg.ends_with('\\') {
                warnings.push(format!(
                    "ERROR: Trailing slashes are not allowed in MANIFEST.in on Windows: {}",
                    arg
                ));
            }
        }
        match cmd {
            "exclude" => {
                for pat in &args {
                    rules.exclude(pat);
                }
            }
            "global-exclude" => {
                for pat in &args {
                    rules.global_exclude(pat);
                }
            }
            "recursive-exclude" => {
                if args.len() < 2 {
                    warnings.push(format!(
                        "You have a wrong line in MANIFEST.in: {:?}\n\
                         'recursive-exclude' expects <dir> <pattern1> <pattern2> ...",
                        line
                    ));
                    continue;
                }
                let dir = args[0].trim_end_matches(|c| c == '/' || c == '\\');
                for pat in &args[1..] {
                    rules.recursive_exclude(dir, pat);
                }
            }
            "prune" => {
                // the argument is a directory name; strip separators to
                // avoid doubled ones in the compiled rule
                let dir = line
                    .split_once(char::is_whitespace)
                    .map(|(_, rest)| rest.trim())
                    .unwrap_or_default()
                    .trim_end_matches(|c| c == '/' || c == '\\');
                rules.prune(dir);
            }
            // include-family directives can re-include files, which the
            // OR-only rule engine cannot express; they are not modeled
            _ => {}
        }
    }
    (rules, warnings)
}

/// Serialize an ignore list back to directive lines. Parsing the result
/// reproduces an equal list for any rules built from the four recognized
/// keywords.
pub fn to_directive_lines(rules: &IgnoreList) -> Vec<String> {
    rules.specs().map(|spec| spec.to_directive_line()).collect()
}
