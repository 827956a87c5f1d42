//! Scoped text file I/O for the changelog and manifests

use crate::core::error::{LockstepError, LockstepResult};
use similar::TextDiff;
use std::fs;
use std::path::Path;

/// Read a UTF-8 text file
pub fn read_text(path: &Path) -> LockstepResult<String> {
  fs::read_to_string(path).map_err(|e| LockstepError::io(path, e))
}

/// Replace a text file's contents
pub fn write_text(path: &Path, contents: &str) -> LockstepResult<()> {
  fs::write(path, contents).map_err(|e| LockstepError::io(path, e))
}

/// Unified diff of a pending file rewrite, labelled with the file's display path
pub fn unified_diff(label: &str, current: &str, updated: &str) -> String {
  let diff = TextDiff::from_lines(current, updated);
  let from = format!("a/{label}");
  let to = format!("b/{label}");
  diff.unified_diff().header(&from, &to).to_string()
}
