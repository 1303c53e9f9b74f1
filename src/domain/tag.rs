use regex::Regex;
use semver::Version;

use crate::error::{FlowtestError, Result};

/// Name of an annotated tag as it appears in a workflow.
///
/// Most tags reuse the name of the branch they replace. The first tag of a
/// run is named after the installed git version, which is only known once
/// git has been asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagName {
    Literal(String),
    GitVersion,
}

impl TagName {
    pub fn literal(name: impl Into<String>) -> Self {
        TagName::Literal(name.into())
    }
}

/// Extract the version from `git --version` output.
///
/// Accepts vendor suffixes such as `2.39.2 (Apple Git-143)` or
/// `2.42.0.windows.2`; a missing patch component is read as `0`.
pub fn parse_git_version(output: &str) -> Result<Version> {
    let re = Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?")
        .map_err(|e| FlowtestError::version(format!("Invalid version pattern: {}", e)))?;

    let caps = re
        .captures(output)
        .ok_or_else(|| FlowtestError::version(format!("No version in '{}'", output.trim())))?;

    let component = |i: usize| -> Result<u64> {
        match caps.get(i) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|e| FlowtestError::version(format!("Bad component '{}': {}", m.as_str(), e))),
            None => Ok(0),
        }
    };

    Ok(Version::new(component(1)?, component(2)?, component(3)?))
}

/// Format the tag name created by the first stage, e.g. `git-2.39.2`.
pub fn version_tag_name(git_version_output: &str) -> Result<String> {
    let version = parse_git_version(git_version_output)?;
    Ok(format!("git-{}", version))
}
