//! Release context - build once, pass everywhere
//!
//! Holds the workspace root, the loaded configuration and the crate list
//! resolved to directories, in publish order. Commands receive it by
//! reference; nothing else carries workspace-specific knowledge.

use crate::core::config::LockstepConfig;
use crate::core::error::{ConfigError, LockstepResult};
use cargo_metadata::MetadataCommand;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A configured crate resolved to its directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrateTarget {
  pub name: String,
  pub dir: PathBuf,
}

impl CrateTarget {
  pub fn manifest_path(&self) -> PathBuf {
    self.dir.join("Cargo.toml")
  }
}

#[derive(Debug, Clone)]
pub struct ReleaseContext {
  /// Workspace root directory
  pub root: PathBuf,

  /// Loaded configuration (defaults when no lockstep.toml exists)
  pub config: LockstepConfig,

  /// Crates in publish order
  pub crates: Vec<CrateTarget>,
}

impl ReleaseContext {
  /// Load configuration from `root` and resolve every crate directory
  pub fn build(root: &Path) -> LockstepResult<Self> {
    let config = LockstepConfig::load(root)?;
    Self::with_config(root, config)
  }

  /// Resolve crate directories for an already loaded configuration
  pub fn with_config(root: &Path, config: LockstepConfig) -> LockstepResult<Self> {
    let needs_metadata = config.crates.iter().any(|c| c.path.is_none());
    let members = if needs_metadata {
      workspace_members(root)?
    } else {
      HashMap::new()
    };

    let crates = config
      .crates
      .iter()
      .map(|krate| {
        let dir = match &krate.path {
          Some(path) => root.join(path),
          None => members
            .get(&krate.name)
            .cloned()
            .ok_or_else(|| ConfigError::CrateNotFound {
              name: krate.name.clone(),
            })?,
        };
        Ok(CrateTarget {
          name: krate.name.clone(),
          dir,
        })
      })
      .collect::<LockstepResult<Vec<_>>>()?;

    Ok(Self {
      root: root.to_path_buf(),
      config,
      crates,
    })
  }

  /// Absolute changelog path
  pub fn changelog_path(&self) -> PathBuf {
    self.root.join(&self.config.changelog)
  }

  /// Every manifest kept in lockstep: the crates in order, then the extras
  pub fn manifest_paths(&self) -> Vec<PathBuf> {
    self
      .crates
      .iter()
      .map(CrateTarget::manifest_path)
      .chain(self.config.extra_manifests.iter().map(|p| self.root.join(p)))
      .collect()
  }

  /// Path relative to the root, for display
  pub fn display_path(&self, path: &Path) -> String {
    path.strip_prefix(&self.root).unwrap_or(path).display().to_string()
  }
}

/// Package name -> directory for every member of the cargo workspace at `root`
fn workspace_members(root: &Path) -> LockstepResult<HashMap<String, PathBuf>> {
  let metadata = MetadataCommand::new().current_dir(root).no_deps().exec()?;

  let mut members = HashMap::new();
  for pkg in metadata.workspace_packages() {
    if let Some(dir) = pkg.manifest_path.parent() {
      members.insert(pkg.name.to_string(), dir.as_std_path().to_path_buf());
    }
  }
  Ok(members)
}
