//! Reconciliation engine
//!
//! Ties everything together: list the files under version control,
//! build an sdist twice (once in place, once from a scratch copy of
//! only the versioned files, since plugins and stale egg-info metadata
//! can make the first build lie), diff the two sides, and report.
//!
//! The engine changes the process working directory for the duration of
//! a run and uses temporary directories; both are scoped guards that
//! restore/clean up on every exit path. No two runs may execute
//! concurrently in one process (a documented single-caller assumption).

use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::archive;
use crate::config;
use crate::error::Result;
use crate::error::CheckError;
use crate::manifest::{self, MANIFEST_FILENAME};
use crate::paths;
use crate::rules::IgnoreList;
use crate::suggest;
use crate::ui::{format_list, format_missing, Reporter};
use crate::util::{self, Chdir, ScratchDir};
use crate::vcs::Vcs;

/// How a distribution archive gets built.
///
/// The build step is an external collaborator: given an output
/// directory, it must produce exactly one archive file there. The
/// engine detects and reports violations of that contract.
pub trait SdistBuilder {
    /// Build one sdist from the current working directory into
    /// `out_dir`. `pretend_version` pins the version for builds from a
    /// scratch copy, where VCS-derived versions would come out wrong.
    fn build(&self, out_dir: &Path, pretend_version: Option<&str>) -> Result<()>;
}

/// The standard builder: `<python> setup.py sdist -d <out_dir>`.
#[derive(Debug, Clone)]
pub struct PythonSdist {
    python: PathBuf,
}

impl PythonSdist {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl SdistBuilder for PythonSdist {
    fn build(&self, out_dir: &Path, pretend_version: Option<&str>) -> Result<()> {
        let python = self.python.to_string_lossy();
        let out = out_dir.to_string_lossy();
        let command = [python.as_ref(), "setup.py", "sdist", "-d", out.as_ref()];
        let env: Vec<(&str, &str)> = match pretend_version {
            Some(version) => vec![("SETUPTOOLS_SCM_PRETEND_VERSION", version)],
            None => Vec::new(),
        };
        util::run(&command, None, &env)?;
        Ok(())
    }
}

/// Options for one reconciliation pass.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Project root to check.
    pub source_tree: PathBuf,
    /// Create a MANIFEST.in if missing.
    pub create: bool,
    /// Append suggested rules to MANIFEST.in (implies create).
    pub update: bool,
    /// Python interpreter for the sdist build.
    pub python: PathBuf,
    /// Extra ignore globs (command-line override).
    pub extra_ignore: Vec<String>,
    /// Extra bad-idea whitelist globs (command-line override).
    pub extra_ignore_bad_ideas: Vec<String>,
    /// Narrate progress.
    pub verbose: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            source_tree: PathBuf::from("."),
            create: false,
            update: false,
            python: PathBuf::from("python"),
            extra_ignore: Vec::new(),
            extra_ignore_bad_ideas: Vec::new(),
            verbose: false,
        }
    }
}

/// Is the directory the root of a Python package (a project descriptor
/// for either the legacy or the modern build flow)?
pub fn is_package(source_tree: &Path) -> bool {
    source_tree.join("setup.py").exists() || source_tree.join("pyproject.toml").exists()
}

/// Compare a generated sdist with the list of files under version
/// control. Returns true if they match and nothing else is wrong.
pub fn check(options: &CheckOptions) -> Result<bool> {
    // the interpreter path must survive the chdir into the project
    let python = if options.python.components().count() > 1 {
        dunce::canonicalize(&options.python)?
    } else {
        options.python.clone()
    };
    check_with_builder(options, &PythonSdist::new(python))
}

/// [`check`] with an explicit build collaborator.
pub fn check_with_builder(options: &CheckOptions, builder: &dyn SdistBuilder) -> Result<bool> {
    let mut ui = Reporter::new(options.verbose);
    let mut all_ok = true;
    let _project = Chdir::enter(&options.source_tree)?;

    if !is_package(Path::new(".")) {
        return Err(CheckError::NotAPythonProject);
    }

    let project_config = config::read_project_config()?;
    let (ignore, ignore_bad_ideas) = build_ignore_lists(options, &project_config, &mut ui)?;

    ui.info_begin("listing source files under version control");
    let vcs = Vcs::detect(Path::new("."))?;
    let all_source_files = paths::canonicalize(vcs.versioned_files(&mut ui)?);
    if all_source_files.is_empty() {
        return Err(CheckError::NoFilesTracked);
    }
    let source_files = ignore.filter(&all_source_files);
    ui.info_continue(&format!(
        ": {} files and directories",
        source_files.len()
    ));

    ui.info_begin("building an sdist");
    let (sdist_files, version) = {
        let tempdir = ScratchDir::new("-sdist")?;
        let sdist = build_one_sdist(builder, &tempdir, None, &ignore, &mut ui)?;
        (sdist.files, sdist.version)
    };

    let existing_source_files: Vec<String> = all_source_files
        .iter()
        .filter(|name| Path::new(name).exists())
        .cloned()
        .collect();
    let missing_source_files: Vec<String> = all_source_files
        .iter()
        .filter(|name| !Path::new(name).exists())
        .cloned()
        .collect();
    if !missing_source_files.is_empty() {
        ui.warning(&format!(
            "some files listed as being under source control are missing:\n{}",
            format_list(&missing_source_files)
        ));
    }

    ui.info_begin("copying source files to a temporary directory");
    let clean_sdist_files = {
        let scratch = ScratchDir::new("-sources")?;
        util::copy_files(&existing_source_files, scratch.path())?;
        // Copy the manifest template and project descriptor even when
        // the ignore rules exclude them: the clean build must see them,
        // or the user gets a confusing "missing from VCS" warning about
        // rules that were silently never applied. A genuinely untracked
        // descriptor is still caught by the comparison itself.
        for extra in [MANIFEST_FILENAME, "setup.py"] {
            if Path::new(extra).exists() && !source_files.iter().any(|f| f == extra) {
                util::copy_files(&[extra], scratch.path())?;
            }
        }
        ui.info_begin("building a clean sdist");
        let _scratch_cwd = Chdir::enter(scratch.path())?;
        let tempdir = ScratchDir::new("-sdist")?;
        let sdist = build_one_sdist(builder, &tempdir, Some(&version), &ignore, &mut ui)?;
        sdist.files
    };

    let a: BTreeSet<&String> = source_files.iter().collect();
    let b: BTreeSet<&String> = sdist_files.iter().collect();
    let c: BTreeSet<&String> = clean_sdist_files.iter().collect();
    let missing_from_sdist: Vec<String> = a.difference(&c).map(|s| s.to_string()).collect();
    let missing_from_vcs: Vec<String> = b
        .union(&c)
        .filter(|name| !a.contains(*name))
        .map(|s| s.to_string())
        .collect();

    if missing_from_sdist.is_empty() && missing_from_vcs.is_empty() {
        ui.info("lists of files in version control and sdist match");
    } else {
        ui.error(&format!(
            "lists of files in version control and sdist do not match!\n{}",
            format_missing(&missing_from_vcs, &missing_from_sdist, "VCS", "sdist")
        ));
        report_suggestions(options, &missing_from_sdist, &existing_source_files, &mut ui)?;
        all_ok = false;
    }

    let bad_idea_rules = IgnoreList::default_bad_ideas();
    let bad_ideas: Vec<String> = all_source_files
        .iter()
        .filter(|name| bad_idea_rules.matches(name) && !ignore_bad_ideas.matches(name))
        .cloned()
        .collect();
    if !bad_ideas.is_empty() {
        ui.warning(&format!(
            "you have {} in source control!\nthat's a bad idea: auto-generated files should not be versioned",
            bad_ideas[0]
        ));
        if bad_ideas.len() > 1 {
            ui.warning(&format!(
                "this also applies to the following:\n{}",
                format_list(&bad_ideas[1..])
            ));
        }
        all_ok = false;
    }

    Ok(all_ok)
}

/// Layer the effective ignore lists: built-in defaults (unless the
/// project opted out), configuration globs, manifest-template rules,
/// command-line extras.
fn build_ignore_lists(
    options: &CheckOptions,
    project_config: &config::ProjectConfig,
    ui: &mut Reporter,
) -> Result<(IgnoreList, IgnoreList)> {
    let mut ignore = if project_config.ignore_default_rules {
        IgnoreList::new()
    } else {
        IgnoreList::default_ignore()
    };
    for pattern in &project_config.ignore {
        ignore.add_glob(pattern);
    }
    let template = Path::new(MANIFEST_FILENAME);
    if template.is_file() {
        let lines = manifest::read_template_lines(template)?;
        let (rules, warnings) = manifest::parse_lines(&lines);
        for warning in warnings {
            ui.warning(&warning);
        }
        ignore.extend(rules);
    }
    for pattern in &options.extra_ignore {
        ignore.add_glob(pattern);
    }

    let mut ignore_bad_ideas = IgnoreList::new();
    for pattern in project_config
        .ignore_bad_ideas
        .iter()
        .chain(&options.extra_ignore_bad_ideas)
    {
        ignore_bad_ideas.add_glob(pattern);
    }
    debug!(
        ignore_rules = ignore.len(),
        bad_idea_whitelist = ignore_bad_ideas.len(),
        "assembled ignore lists"
    );
    Ok((ignore, ignore_bad_ideas))
}

struct BuiltSdist {
    files: Vec<String>,
    version: String,
}

/// Run the builder into `tempdir`, then read back, strip the top-level
/// directory, and filter the resulting file list.
fn build_one_sdist(
    builder: &dyn SdistBuilder,
    tempdir: &ScratchDir,
    pretend_version: Option<&str>,
    ignore: &IgnoreList,
    ui: &mut Reporter,
) -> Result<BuiltSdist> {
    builder.build(tempdir.path(), pretend_version)?;
    let sdist_filename = util::get_one_file_in(tempdir.path())?;
    ui.info_continue(&format!(
        ": {}",
        sdist_filename
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
    ));
    let listed = paths::canonicalize(archive::file_list(&sdist_filename)?);
    let files = ignore.filter(&paths::strip_toplevel_name(&listed)?);
    ui.info_continue(&format!(": {} files and directories", files.len()));
    Ok(BuiltSdist {
        version: archive::extract_version_from_filename(&sdist_filename),
        files,
    })
}

/// Report what could fix the diff, and apply it when asked to.
fn report_suggestions(
    options: &CheckOptions,
    missing_from_sdist: &[String],
    existing_source_files: &[String],
    ui: &mut Reporter,
) -> Result<()> {
    let (suggestions, unknowns) = suggest::find_suggestions(missing_from_sdist);
    let template_exists = Path::new(MANIFEST_FILENAME).exists();
    let user_asked_for_help = options.update || (options.create && !template_exists);

    if !existing_source_files.iter().any(|f| f == MANIFEST_FILENAME) {
        if !suggestions.is_empty() && !user_asked_for_help {
            ui.info("no MANIFEST.in found; you can run 'manifest-check -c' to create one");
        } else {
            ui.info("no MANIFEST.in found");
        }
    }

    if !suggestions.is_empty() {
        ui.info(&format!(
            "suggested MANIFEST.in rules:\n{}",
            format_list(&suggestions)
        ));
        if user_asked_for_help {
            let mut template = OpenOptions::new()
                .create(true)
                .append(true)
                .open(MANIFEST_FILENAME)?;
            if !template_exists {
                ui.info("creating MANIFEST.in");
            } else {
                ui.info("updating MANIFEST.in");
                template.write_all(b"\n# added by manifest-check\n")?;
            }
            template.write_all(suggestions.join("\n").as_bytes())?;
            template.write_all(b"\n")?;
            if !unknowns.is_empty() {
                ui.info(&format!(
                    "don't know how to come up with rules matching\n{}",
                    format_list(&unknowns)
                ));
            }
        }
    } else if user_asked_for_help {
        ui.info("don't know how to come up with rules matching any of the files, sorry!");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;

    #[test]
    fn test_is_package() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!is_package(tmp.path()));
        fs::write(tmp.path().join("setup.py"), "").unwrap();
        assert!(is_package(tmp.path()));
    }

    #[test]
    fn test_is_package_modern_descriptor() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("pyproject.toml"), "").unwrap();
        assert!(is_package(tmp.path()));
    }

    #[test]
    #[serial]
    fn test_check_rejects_non_package() {
        let tmp = tempfile::tempdir().unwrap();
        let options = CheckOptions {
            source_tree: tmp.path().to_path_buf(),
            ..CheckOptions::default()
        };
        let before = env::current_dir().unwrap();
        let err = check(&options).unwrap_err();
        assert!(matches!(err, CheckError::NotAPythonProject));
        // the chdir guard must have restored the working directory
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_build_ignore_lists_layering() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(MANIFEST_FILENAME),
            "exclude *.nsi\nprune build\n",
        )
        .unwrap();
        let _cwd = Chdir::enter(tmp.path()).unwrap();
        let options = CheckOptions {
            extra_ignore: vec!["extra.txt".to_string()],
            extra_ignore_bad_ideas: vec!["grammar.pyc".to_string()],
            ..CheckOptions::default()
        };
        let project_config = config::ProjectConfig {
            ignore: vec!["docs/_build/*".to_string()],
            ..config::ProjectConfig::default()
        };
        let mut ui = Reporter::new(false);
        let (ignore, bad_ideas) =
            build_ignore_lists(&options, &project_config, &mut ui).unwrap();

        let mut expected = IgnoreList::default_ignore();
        expected
            .exclude("docs/_build/*")
            .exclude("*.nsi")
            .prune("build")
            .global_exclude("extra.txt");
        assert_eq!(ignore, expected);

        let mut expected_bad = IgnoreList::new();
        expected_bad.global_exclude("grammar.pyc");
        assert_eq!(bad_ideas, expected_bad);
    }

    #[test]
    #[serial]
    fn test_build_ignore_lists_opt_out_of_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let _cwd = Chdir::enter(tmp.path()).unwrap();
        let project_config = config::ProjectConfig {
            ignore_default_rules: true,
            ..config::ProjectConfig::default()
        };
        let mut ui = Reporter::new(false);
        let (ignore, _) =
            build_ignore_lists(&CheckOptions::default(), &project_config, &mut ui).unwrap();
        assert!(ignore.is_empty());
    }
}
