//! Release version: dotted non-negative integer components
//!
//! The original text is kept and is what gets written back to manifests and
//! the changelog. The integer components only feed the factorizer.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A dotted version such as `1.4.0`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
  text: String,
  components: Vec<u64>,
}

impl Version {
  /// Integer components in their original order
  pub fn components(&self) -> &[u64] {
    &self.components
  }

  /// The version exactly as it was written
  pub fn as_str(&self) -> &str {
    &self.text
  }

  /// Strict semver view of this version, if it is one
  pub fn to_semver(&self) -> Option<semver::Version> {
    semver::Version::parse(&self.text).ok()
  }
}

impl FromStr for Version {
  type Err = VersionParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.is_empty() {
      return Err(VersionParseError::new(s, "empty version"));
    }

    let components = s
      .split('.')
      .map(|part| {
        if part.is_empty() {
          return Err(VersionParseError::new(s, "empty component"));
        }
        if !part.bytes().all(|b| b.is_ascii_digit()) {
          return Err(VersionParseError::new(s, "components must be digits only"));
        }
        part
          .parse::<u64>()
          .map_err(|_| VersionParseError::new(s, "component out of range"))
      })
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Self {
      text: s.to_string(),
      components,
    })
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.text)
  }
}

impl Serialize for Version {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.text)
  }
}

/// Error returned when a string is not a dotted integer version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError {
  input: String,
  reason: &'static str,
}

impl VersionParseError {
  fn new(input: &str, reason: &'static str) -> Self {
    Self {
      input: input.to_string(),
      reason,
    }
  }
}

impl fmt::Display for VersionParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Invalid version '{}': {}", self.input, self.reason)
  }
}

impl std::error::Error for VersionParseError {}
