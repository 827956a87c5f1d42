//! Annotated changelog header: `# <version> (api=<api>, abi=<abi>)`

use crate::release::changelog::{header_version, lines_with_endings};
use crate::release::factor::{ABI_BASE, API_BASE, factor_version};
use crate::release::version::Version;
use serde::Serialize;
use std::fmt;

/// A release header with its derived compatibility counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogHeader {
  pub version: Version,
  pub api: String,
  pub abi: String,
}

impl ChangelogHeader {
  /// Derive the counters for a version
  pub fn for_version(version: &Version) -> Self {
    Self {
      version: version.clone(),
      api: factor_version(version, API_BASE),
      abi: factor_version(version, ABI_BASE),
    }
  }
}

impl fmt::Display for ChangelogHeader {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "# {} (api={}, abi={})", self.version, self.api, self.abi)
  }
}

/// Replace the first header line of the changelog with the annotated header.
///
/// Every other byte, line endings included, is kept. Text without a header
/// line comes back unchanged.
pub fn rewrite_header(changelog: &str, version: &Version) -> String {
  let header = ChangelogHeader::for_version(version).to_string();
  let mut out = String::with_capacity(changelog.len() + header.len());
  let mut replaced = false;

  for line in lines_with_endings(changelog) {
    if !replaced && header_version(line.content).is_some() {
      out.push_str(&header);
      replaced = true;
    } else {
      out.push_str(line.content);
    }
    out.push_str(line.ending);
  }

  out
}

/// Put a new annotated header line above the existing changelog.
///
/// Used when a release version is given explicitly and the changelog does not
/// start with it yet. Follows the changelog's line ending style.
pub fn insert_header(changelog: &str, version: &Version) -> String {
  let header = ChangelogHeader::for_version(version);
  let eol = if changelog.contains("\r\n") { "\r\n" } else { "\n" };
  if changelog.is_empty() {
    return format!("{header}{eol}");
  }
  format!("{header}{eol}{eol}{changelog}")
}
