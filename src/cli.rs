//! Command-line interface for manifest-check

use std::path::PathBuf;

use clap::Parser;

use crate::check::CheckOptions;

/// Check a Python MANIFEST.in file for completeness
#[derive(Debug, Parser)]
#[command(
    name = "manifest-check",
    version,
    about = "Check a Python MANIFEST.in file for completeness",
    long_about = "Builds a source distribution and compares its file list against the \
                  files under version control, suggesting MANIFEST.in rules for anything \
                  that is missing."
)]
pub struct Cli {
    /// Location of the source tree
    #[arg(default_value = ".")]
    pub source_tree: PathBuf,

    /// More verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Create a MANIFEST.in if missing
    #[arg(short, long)]
    pub create: bool,

    /// Append suggestions to MANIFEST.in (implies --create)
    #[arg(short, long)]
    pub update: bool,

    /// Use this Python interpreter for running setup.py sdist
    #[arg(short, long, default_value = "python")]
    pub python: PathBuf,

    /// Ignore files/directories matching these comma-separated patterns
    #[arg(long, value_name = "patterns")]
    pub ignore: Option<String>,

    /// Ignore bad idea files/directories matching these comma-separated patterns
    #[arg(long, value_name = "patterns")]
    pub ignore_bad_ideas: Option<String>,
}

impl Cli {
    /// Turn the parsed arguments into engine options.
    pub fn into_options(self) -> CheckOptions {
        CheckOptions {
            source_tree: self.source_tree,
            create: self.create || self.update,
            update: self.update,
            python: self.python,
            extra_ignore: split_patterns(self.ignore.as_deref()),
            extra_ignore_bad_ideas: split_patterns(self.ignore_bad_ideas.as_deref()),
            verbose: self.verbose,
        }
    }
}

fn split_patterns(arg: Option<&str>) -> Vec<String> {
    arg.map(|patterns| {
        patterns
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_patterns() {
        assert_eq!(split_patterns(None), Vec::<String>::new());
        assert_eq!(
            split_patterns(Some("*.mo, docs/_build/*")),
            vec!["*.mo", "docs/_build/*"]
        );
    }

    #[test]
    fn test_update_implies_create() {
        let cli = Cli::parse_from(["manifest-check", "-u"]);
        let options = cli.into_options();
        assert!(options.update);
        assert!(options.create);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["manifest-check"]);
        let options = cli.into_options();
        assert_eq!(options.source_tree, PathBuf::from("."));
        assert_eq!(options.python, PathBuf::from("python"));
        assert!(!options.verbose);
    }
}
