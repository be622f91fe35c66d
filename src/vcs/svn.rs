//! Subversion adapter

use crate::error::{CheckError, Result};
use crate::ui::Reporter;
use crate::util::run;

/// List all files under SVN control in the current directory.
///
/// `svn st -vq --xml` may need a network round-trip on old working
/// copies; accepted cost. Entries look like:
///
/// ```xml
/// <entry path="unchanged.txt">
///   <wc-status item="normal" revision="1" props="none">
///     <commit revision="1">…</commit>
///   </wc-status>
/// </entry>
/// ```
pub fn versioned_files(ui: &mut Reporter) -> Result<Vec<String>> {
    let output = run(&["svn", "st", "-vq", "--xml"], None, &[])?;
    parse_status_xml(&output, ui)
}

fn parse_status_xml(xml: &str, ui: &mut Reporter) -> Result<Vec<String>> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| CheckError::svn_status_parse(e.to_string()))?;
    let mut files = Vec::new();
    for entry in doc
        .descendants()
        .filter(|node| node.has_tag_name("entry"))
    {
        let path = entry.attribute("path").unwrap_or_default();
        if path == "." {
            continue;
        }
        let status = entry
            .children()
            .find(|node| node.has_tag_name("wc-status"));
        match status {
            None => {
                ui.warning(&format!(
                    "svn status --xml parse error: <entry path=\"{}\"> without <wc-status>",
                    path
                ));
            }
            Some(status) => {
                // externals produce a second bookkeeping entry; keeping
                // both would double-count them
                let item = status.attribute("item").unwrap_or_default();
                if item != "unversioned" && item != "external" {
                    files.push(path.to_string());
                }
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STATUS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<status>
  <target path=".">
    <entry path=".">
      <wc-status item="normal" revision="3" props="none"/>
    </entry>
    <entry path="unchanged.txt">
      <wc-status item="normal" revision="1" props="none">
        <commit revision="1"><author>mg</author></commit>
      </wc-status>
    </entry>
    <entry path="added-but-not-committed.txt">
      <wc-status item="added" revision="-1" props="none"></wc-status>
    </entry>
    <entry path="ext">
      <wc-status item="external" props="none"></wc-status>
    </entry>
    <entry path="unknown.txt">
      <wc-status props="none" item="unversioned"></wc-status>
    </entry>
  </target>
</status>
"#;

    #[test]
    fn test_parse_status_xml() {
        let mut ui = Reporter::new(false);
        assert_eq!(
            parse_status_xml(STATUS_XML, &mut ui).unwrap(),
            vec!["added-but-not-committed.txt", "unchanged.txt"]
        );
    }

    #[test]
    fn test_parse_status_xml_rejects_garbage() {
        let mut ui = Reporter::new(false);
        assert!(parse_status_xml("not xml at all <", &mut ui).is_err());
    }
}
