//! Suggestion inference
//!
//! Given files present in version control but absent from the sdist,
//! propose MANIFEST.in rules that would pick them up. Each path is tried
//! against an ordered table of (regex, rule template) pairs; the first
//! match wins and its capture groups are substituted into the template.
//! Specific extension and directory rules come first; the generic
//! catch-alls at the end would otherwise swallow everything.

use std::collections::BTreeSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

static SUGGESTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"^([^/]+[.](cfg|ini))$", "include $1"),
        (r"^([.]travis[.]yml)$", "include $1"),
        (r"^([.]coveragerc)$", "include $1"),
        (r"^([A-Z]+)$", "include $1"),
        (r"^(Makefile)$", "include $1"),
        (r"^[^/]+[.](txt|rst|py)$", "include *.$1"),
        (
            r"^([a-zA-Z_][a-zA-Z_0-9]*)/.*[.](py|zcml|pt|mako|xml|html|txt|rst|css|png|jpg|dot|po|pot|mo|ui|desktop|bat)$",
            "recursive-include $1 *.$2",
        ),
        (
            r"^([a-zA-Z_][a-zA-Z_0-9]*)(?:/.*)?/(Makefile)$",
            "recursive-include $1 $2",
        ),
        // catch-all rules that actually cover some of the above;
        // somewhat experimental: false positives are possible
        (r"^([a-zA-Z_0-9]+)$", "include $1"),
        (r"^[^/]+[.]([a-zA-Z_0-9]+)$", "include *.$1"),
        (
            r"^([a-zA-Z_][a-zA-Z_0-9]*)/.*[.]([a-zA-Z_0-9]+)$",
            "recursive-include $1 *.$2",
        ),
    ]
    .into_iter()
    .map(|(pattern, template)| {
        (
            Regex::new(pattern).expect("suggestion table patterns are valid"),
            template,
        )
    })
    .collect()
});

/// Suggest manifest-template rules for the given paths.
///
/// Returns the sorted, deduplicated suggestions and the paths no rule
/// template matched, in their original order. Directory entries are
/// skipped: empty directories cannot be added through a manifest
/// template anyway, and non-empty ones are covered transitively once a
/// pattern for the files inside them exists.
pub fn find_suggestions(filelist: &[String]) -> (Vec<String>, Vec<String>) {
    let mut suggestions = BTreeSet::new();
    let mut unknowns = Vec::new();
    for filename in filelist {
        if Path::new(filename).is_dir() {
            continue;
        }
        match SUGGESTIONS
            .iter()
            .find(|(pattern, _)| pattern.is_match(filename))
        {
            Some((pattern, template)) => {
                suggestions.insert(pattern.replace(filename, *template).into_owned());
            }
            None => unknowns.push(filename.clone()),
        }
    }
    (suggestions.into_iter().collect(), unknowns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_extension_rule() {
        let (suggestions, unknowns) = find_suggestions(&files(&["README.txt", "CHANGES.txt"]));
        assert_eq!(suggestions, files(&["include *.txt"]));
        assert!(unknowns.is_empty());
    }

    #[test]
    fn test_unmatched_paths_are_reported() {
        let (suggestions, unknowns) = find_suggestions(&files(&["unknown.file~"]));
        assert!(suggestions.is_empty());
        assert_eq!(unknowns, files(&["unknown.file~"]));
    }

    #[test]
    fn test_nested_package_files() {
        let (suggestions, unknowns) =
            find_suggestions(&files(&["mypkg/data/some.html", "mypkg/tpl/page.html"]));
        assert_eq!(suggestions, files(&["recursive-include mypkg *.html"]));
        assert!(unknowns.is_empty());
    }

    #[test]
    fn test_specific_rules_win_over_catch_alls() {
        let (suggestions, _) = find_suggestions(&files(&["setup.cfg", ".travis.yml", "Makefile"]));
        assert_eq!(
            suggestions,
            files(&["include .travis.yml", "include Makefile", "include setup.cfg"])
        );
    }

    #[test]
    fn test_nested_makefile() {
        let (suggestions, unknowns) = find_suggestions(&files(&["src/sub/dir/Makefile"]));
        assert_eq!(suggestions, files(&["recursive-include src Makefile"]));
        assert!(unknowns.is_empty());
    }

    #[test]
    fn test_uppercase_no_extension() {
        let (suggestions, _) = find_suggestions(&files(&["LICENSE"]));
        assert_eq!(suggestions, files(&["include LICENSE"]));
    }

    #[test]
    fn test_mixed_input_preserves_unknown_order() {
        let (suggestions, unknowns) =
            find_suggestions(&files(&["b.file~", "README.rst", "a.file~"]));
        assert_eq!(suggestions, files(&["include *.rst"]));
        assert_eq!(unknowns, files(&["b.file~", "a.file~"]));
    }
}
