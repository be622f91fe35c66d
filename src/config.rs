//! Project configuration
//!
//! Projects can tune the checker from the first of three configuration
//! locations that declares the relevant section, searched in order:
//!
//! 1. `pyproject.toml`, table `[tool.manifest-check]`
//! 2. `setup.cfg`, section `[tool:manifest-check]`
//! 3. `setup.cfg`, section `[check-manifest]` (the historical name)
//!
//! Three settings are recognized: `ignore-default-rules` (replace the
//! built-in ignore rules instead of extending them), `ignore` (extra
//! ignore globs) and `ignore-bad-ideas` (whitelist for the bad-idea
//! scan).
//!
//! setup.cfg is ConfigParser-style INI: values may continue over
//! indented lines, which none of the usual INI crates model, so the
//! section reader lives here.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CheckError, Result};

/// Checker settings declared by the project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Discard the built-in default ignore rules.
    pub ignore_default_rules: bool,
    /// Extra ignore globs.
    pub ignore: Vec<String>,
    /// Globs whitelisting files from the bad-idea scan.
    pub ignore_bad_ideas: Vec<String>,
}

/// Read the project configuration from the current directory.
pub fn read_project_config() -> Result<ProjectConfig> {
    read_project_config_in(Path::new("."))
}

/// Read the project configuration from `dir`.
pub fn read_project_config_in(dir: &Path) -> Result<ProjectConfig> {
    if let Some(config) = read_pyproject(&dir.join("pyproject.toml"))? {
        return Ok(config);
    }
    let setup_cfg = dir.join("setup.cfg");
    for section in ["tool:manifest-check", "check-manifest"] {
        if let Some(config) = read_setup_cfg(&setup_cfg, section)? {
            return Ok(config);
        }
    }
    Ok(ProjectConfig::default())
}

#[derive(Debug, Deserialize)]
struct Pyproject {
    tool: Option<PyprojectTool>,
}

#[derive(Debug, Deserialize)]
struct PyprojectTool {
    #[serde(rename = "manifest-check")]
    manifest_check: Option<PyprojectSection>,
}

#[derive(Debug, Default, Deserialize)]
struct PyprojectSection {
    #[serde(rename = "ignore-default-rules", default)]
    ignore_default_rules: bool,
    #[serde(default)]
    ignore: Vec<String>,
    #[serde(rename = "ignore-bad-ideas", default)]
    ignore_bad_ideas: Vec<String>,
}

fn read_pyproject(path: &Path) -> Result<Option<ProjectConfig>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let parsed: Pyproject =
        toml::from_str(&content).map_err(|e| CheckError::config_parse(path, e))?;
    let section = match parsed.tool.and_then(|tool| tool.manifest_check) {
        Some(section) => section,
        None => return Ok(None),
    };
    Ok(Some(ProjectConfig {
        ignore_default_rules: section.ignore_default_rules,
        ignore: section.ignore,
        ignore_bad_ideas: section.ignore_bad_ideas,
    }))
}

fn read_setup_cfg(path: &Path, section: &str) -> Result<Option<ProjectConfig>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let entries = match ini_section(&content, section) {
        Some(entries) => entries,
        None => return Ok(None),
    };
    let mut config = ProjectConfig::default();
    for (key, value) in entries {
        match key.as_str() {
            "ignore-default-rules" => config.ignore_default_rules = ini_bool(&value),
            "ignore" => config.ignore = ini_list(&value),
            "ignore-bad-ideas" => config.ignore_bad_ideas = ini_list(&value),
            _ => {}
        }
    }
    Ok(Some(config))
}

/// Extract one INI section as (key, value) pairs, or None if the section
/// is not declared. Indented lines continue the previous value.
fn ini_section(content: &str, wanted: &str) -> Option<Vec<(String, String)>> {
    let mut in_section = false;
    let mut found = false;
    let mut entries: Vec<(String, String)> = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim_end();
        if trimmed.trim_start().starts_with('#') || trimmed.trim_start().starts_with(';') {
            continue;
        }
        if let Some(name) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            in_section = name == wanted;
            found |= in_section;
            continue;
        }
        if !in_section || trimmed.is_empty() {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            // continuation of the previous value
            if let Some((_, value)) = entries.last_mut() {
                value.push('\n');
                value.push_str(trimmed.trim_start());
            }
            continue;
        }
        let (key, value) = match trimmed.split_once(|c| c == '=' || c == ':') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (trimmed.trim().to_string(), String::new()),
        };
        entries.push((key, value));
    }
    if found {
        Some(entries)
    } else {
        None
    }
}

fn ini_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "yes" | "true" | "on"
    )
}

fn ini_list(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_missing_config_files() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(
            read_project_config_in(tmp.path()).unwrap(),
            ProjectConfig::default()
        );
    }

    #[test]
    fn test_pyproject_section() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "pyproject.toml",
            r#"
[tool.manifest-check]
ignore-default-rules = true
ignore = ["*.mo", "docs/_build/*"]
ignore-bad-ideas = ["grammar.pyc"]
"#,
        );
        let config = read_project_config_in(tmp.path()).unwrap();
        assert!(config.ignore_default_rules);
        assert_eq!(config.ignore, vec!["*.mo", "docs/_build/*"]);
        assert_eq!(config.ignore_bad_ideas, vec!["grammar.pyc"]);
    }

    #[test]
    fn test_setup_cfg_section_with_continuation_lines() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "setup.cfg",
            "[metadata]\nname = pkg\n\n[check-manifest]\nignore =\n    *.mo\n    docs/_build/*\n",
        );
        let config = read_project_config_in(tmp.path()).unwrap();
        assert!(!config.ignore_default_rules);
        assert_eq!(config.ignore, vec!["*.mo", "docs/_build/*"]);
    }

    #[test]
    fn test_setup_cfg_tool_section_wins_over_historical_name() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "setup.cfg",
            "[check-manifest]\nignore = old.txt\n\n[tool:manifest-check]\nignore = new.txt\n",
        );
        let config = read_project_config_in(tmp.path()).unwrap();
        assert_eq!(config.ignore, vec!["new.txt"]);
    }

    #[test]
    fn test_pyproject_wins_over_setup_cfg() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "pyproject.toml",
            "[tool.manifest-check]\nignore = [\"from-pyproject\"]\n",
        );
        write(
            tmp.path(),
            "setup.cfg",
            "[check-manifest]\nignore = from-setup-cfg\n",
        );
        let config = read_project_config_in(tmp.path()).unwrap();
        assert_eq!(config.ignore, vec!["from-pyproject"]);
    }

    #[test]
    fn test_pyproject_without_section_falls_through() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "pyproject.toml", "[tool.black]\nline-length = 99\n");
        write(
            tmp.path(),
            "setup.cfg",
            "[check-manifest]\nignore-default-rules = yes\n",
        );
        let config = read_project_config_in(tmp.path()).unwrap();
        assert!(config.ignore_default_rules);
    }

    #[test]
    fn test_broken_pyproject_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "pyproject.toml", "not valid toml [");
        assert!(matches!(
            read_project_config_in(tmp.path()),
            Err(CheckError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_ini_bool() {
        assert!(ini_bool("1"));
        assert!(ini_bool("Yes"));
        assert!(ini_bool("true"));
        assert!(!ini_bool("0"));
        assert!(!ini_bool("no"));
    }
}
