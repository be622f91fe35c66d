//! Ignore rule engine
//!
//! An [`IgnoreList`] is an ordered collection of compiled path-matching
//! rules. Rules come in four kinds, mirroring the exclusion directives of
//! a packaging manifest template:
//!
//! - [`IgnoreList::exclude`]: the path must equal the glob-expanded
//!   pattern; wildcards never cross `/`.
//! - [`IgnoreList::global_exclude`]: the pattern matches anywhere in the
//!   tree, anchored at a path component (`**/pattern`).
//! - [`IgnoreList::recursive_exclude`]: `dir/**/pattern`.
//! - [`IgnoreList::prune`]: a subtree, `dir` and everything beneath it.
//!
//! The list is a logical OR over all compiled matchers. It is built once
//! per reconciliation pass (defaults, then project configuration, then
//! manifest-derived rules, then command-line extras) and used read-only;
//! no global state is involved, so repeated runs in one process cannot
//! leak configuration into each other.

use regex::Regex;

use crate::pattern::glob_to_regex;

/// One rule, as specified. Equality of two [`IgnoreList`]s is defined
/// over their rule specifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSpec {
    Exclude(String),
    GlobalExclude(String),
    RecursiveExclude(String, String),
    Prune(String),
}

impl RuleSpec {
    /// Render the rule back as a manifest-template directive line.
    pub fn to_directive_line(&self) -> String {
        match self {
            RuleSpec::Exclude(pat) => format!("exclude {}", pat),
            RuleSpec::GlobalExclude(pat) => format!("global-exclude {}", pat),
            RuleSpec::RecursiveExclude(dir, pat) => {
                format!("recursive-exclude {} {}", dir, pat)
            }
            RuleSpec::Prune(dir) => format!("prune {}", dir),
        }
    }

    fn compile(&self) -> Regex {
        let anchored = match self {
            RuleSpec::Exclude(pat) => format!("^{}$", glob_to_regex(pat)),
            RuleSpec::GlobalExclude(pat) => {
                format!("^(?:.*/)?{}$", glob_to_regex(pat))
            }
            RuleSpec::RecursiveExclude(dir, pat) => {
                format!("^{}/(?:.*/)?{}$", glob_to_regex(dir), glob_to_regex(pat))
            }
            RuleSpec::Prune(dir) => format!("^{}(?:/.*)?$", glob_to_regex(dir)),
        };
        // glob_to_regex escapes everything it does not translate, so the
        // anchored pattern is always a valid regex.
        Regex::new(&anchored).expect("glob translation produced an invalid regex")
    }
}

/// An ordered, compiled set of ignore rules.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    rules: Vec<(RuleSpec, Regex)>,
}

impl PartialEq for IgnoreList {
    fn eq(&self, other: &Self) -> bool {
        self.specs().eq(other.specs())
    }
}

impl Eq for IgnoreList {}

impl IgnoreList {
    /// An empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in default rules: generated package metadata, compiled
    /// message catalogs, and CI-template files legitimately differ
    /// between version control and an sdist.
    pub fn default_ignore() -> Self {
        let mut list = Self::new();
        for pat in [
            "PKG-INFO",      // always generated
            "*.egg-info",    // always generated
            "*.egg-info/*",  // always generated
            "setup.cfg",     // always generated, sometimes also kept in VCS
            ".hgtags",
            ".hgsigs",
            ".hgignore",
            ".gitignore",
            ".bzrignore",
            ".gitattributes",
            ".travis.yml",
            "Jenkinsfile",
            // shipping compiled .mo files in sdists is convenient, but
            // they should not be checked in
            "*.mo",
        ] {
            list.global_exclude(pat);
        }
        list
    }

    /// Patterns for generated files that should never be committed.
    /// This list flags, it does not filter.
    pub fn default_bad_ideas() -> Self {
        let mut list = Self::new();
        for pat in [
            "PKG-INFO",
            "*.egg-info",
            "*.mo",
            "*.py[co]",
            "*.so",
            "*.pyd",
            "*~",
            ".*.sw[po]",
            ".#*",
        ] {
            list.global_exclude(pat);
        }
        list
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Iterate over the rule specifications, in order.
    pub fn specs(&self) -> impl Iterator<Item = &RuleSpec> {
        self.rules.iter().map(|(spec, _)| spec)
    }

    /// Append a rule.
    pub fn push(&mut self, spec: RuleSpec) -> &mut Self {
        let regex = spec.compile();
        self.rules.push((spec, regex));
        self
    }

    /// Append every rule of `other`, preserving order.
    pub fn extend(&mut self, other: IgnoreList) -> &mut Self {
        self.rules.extend(other.rules);
        self
    }

    /// Exact-path exclude: matches `path == pattern` after glob
    /// expansion; wildcards do not cross directory boundaries.
    pub fn exclude(&mut self, pattern: &str) -> &mut Self {
        self.push(RuleSpec::Exclude(pattern.to_string()))
    }

    /// Basename-anchored exclude anywhere in the tree (`**/pattern`).
    pub fn global_exclude(&mut self, pattern: &str) -> &mut Self {
        self.push(RuleSpec::GlobalExclude(pattern.to_string()))
    }

    /// Exclude `dir/**/pattern`.
    pub fn recursive_exclude(&mut self, dir: &str, pattern: &str) -> &mut Self {
        self.push(RuleSpec::RecursiveExclude(dir.to_string(), pattern.to_string()))
    }

    /// Exclude `dir` and everything beneath it.
    pub fn prune(&mut self, dir: &str) -> &mut Self {
        self.push(RuleSpec::Prune(dir.to_string()))
    }

    /// Add a user-supplied glob (configuration `ignore` entries and the
    /// `--ignore` command-line override). Patterns with a `/` are matched
    /// against the whole path, bare patterns anywhere in the tree.
    pub fn add_glob(&mut self, pattern: &str) -> &mut Self {
        if pattern.contains('/') {
            self.exclude(pattern)
        } else {
            self.global_exclude(pattern)
        }
    }

    /// Does any rule match this path?
    pub fn matches(&self, path: &str) -> bool {
        self.rules.iter().any(|(_, regex)| regex.is_match(path))
    }

    /// Return only the entries not matched by any rule.
    pub fn filter(&self, filelist: &[String]) -> Vec<String> {
        filelist
            .iter()
            .filter(|name| !self.matches(name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exclude_is_exact() {
        let mut list = IgnoreList::new();
        list.exclude("dirname/*css");
        assert!(list.matches("dirname/foo.css"));
        assert!(!list.matches("dirname/subdir/bar.css"));
        assert!(!list.matches("other/dirname/foo.css"));
    }

    #[test]
    fn test_global_exclude_does_not_cross_separator() {
        let mut list = IgnoreList::new();
        list.global_exclude("*.ext");
        assert_eq!(
            list.filter(&files(&["x.ext", "dir/y.ext", "dir/sub/z.other"])),
            files(&["dir/sub/z.other"])
        );
    }

    #[test]
    fn test_recursive_exclude() {
        let mut list = IgnoreList::new();
        list.recursive_exclude("docs", "*.gif");
        assert!(list.matches("docs/spinner.gif"));
        assert!(list.matches("docs/img/anim/spinner.gif"));
        assert!(!list.matches("spinner.gif"));
        assert!(!list.matches("documents/spinner.gif"));
    }

    #[test]
    fn test_recursive_exclude_star_equals_prune_for_files() {
        let mut rec = IgnoreList::new();
        rec.recursive_exclude("subdir", "*");
        let mut pru = IgnoreList::new();
        pru.prune("subdir");
        let filelist = files(&[
            "subdir/a",
            "subdir/deep/b",
            "subdirx/c",
            "other/subdir/d",
            "keep.txt",
        ]);
        assert_eq!(rec.filter(&filelist), pru.filter(&filelist));
        assert_eq!(
            rec.filter(&filelist),
            files(&["subdirx/c", "other/subdir/d", "keep.txt"])
        );
    }

    #[test]
    fn test_prune_matches_the_directory_itself() {
        let mut list = IgnoreList::new();
        list.prune("build");
        assert!(list.matches("build"));
        assert!(list.matches("build/lib/x.py"));
        assert!(!list.matches("builds"));
    }

    #[test]
    fn test_default_ignore() {
        let list = IgnoreList::default_ignore();
        assert!(list.matches("PKG-INFO"));
        assert!(list.matches("src/zope.foo.egg-info"));
        assert!(list.matches("src/zope.foo.egg-info/SOURCES.txt"));
        assert!(list.matches("locale/de/LC_MESSAGES/mydomain.mo"));
        assert!(list.matches(".travis.yml"));
        assert!(!list.matches("setup.py"));
    }

    #[test]
    fn test_default_bad_ideas() {
        let list = IgnoreList::default_bad_ideas();
        assert!(list.matches("foo.egg-info"));
        assert!(list.matches("moo.mo"));
        assert!(list.matches("src/x.pyc"));
        assert!(list.matches(".main.py.swp"));
        assert!(list.matches("notes.txt~"));
        assert!(!list.matches("main.py"));
    }

    #[test]
    fn test_equality_is_over_specs() {
        let mut a = IgnoreList::new();
        a.global_exclude("*.mo").prune("dist");
        let mut b = IgnoreList::new();
        b.global_exclude("*.mo").prune("dist");
        assert_eq!(a, b);
        b.exclude("extra");
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_glob_dispatch() {
        let mut list = IgnoreList::new();
        list.add_glob("*.mo").add_glob("docs/_build/*");
        let mut expected = IgnoreList::new();
        expected.global_exclude("*.mo").exclude("docs/_build/*");
        assert_eq!(list, expected);
    }
}
