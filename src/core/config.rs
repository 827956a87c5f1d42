use crate::core::error::{ConfigError, LockstepError, LockstepResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for cargo-lockstep
/// Searched in order: lockstep.toml, .lockstep.toml, .cargo/lockstep.toml, .config/lockstep.toml
///
/// # Example
///
/// ```toml
/// changelog = "CHANGELOG.md"
/// family_prefix = "stabby-"
/// editor = "code --wait"
/// publish_command = ["cargo", "publish"]
///
/// # Publish order: dependencies first
/// [[crates]]
/// name = "stabby-macros"
/// path = "stabby-macros"
///
/// [[crates]]
/// name = "stabby-abi"
/// path = "stabby-abi"
///
/// [[crates]]
/// name = "stabby"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockstepConfig {
  /// Changelog whose top header carries the pending version
  #[serde(default = "default_changelog")]
  pub changelog: PathBuf,

  /// Dependencies whose name starts with this prefix follow the release version
  #[serde(default = "default_family_prefix")]
  pub family_prefix: String,

  /// Editor command (default: $VISUAL, then $EDITOR, then vi)
  #[serde(default)]
  pub editor: Option<String>,

  /// Program and leading arguments run in each crate directory
  #[serde(default = "default_publish_command")]
  pub publish_command: Vec<String>,

  /// Further manifests to keep in lockstep (e.g. the workspace root), never published
  #[serde(default)]
  pub extra_manifests: Vec<PathBuf>,

  /// Crates in publish order
  #[serde(default = "default_crates")]
  pub crates: Vec<CrateConfig>,
}

/// One crate of the family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrateConfig {
  pub name: String,
  /// Crate directory relative to the workspace root.
  /// When absent the crate is looked up among the cargo workspace members.
  #[serde(default)]
  pub path: Option<PathBuf>,
}

impl CrateConfig {
  fn at(name: &str) -> Self {
    Self {
      name: name.to_string(),
      path: Some(PathBuf::from(name)),
    }
  }
}

fn default_changelog() -> PathBuf {
  PathBuf::from("CHANGELOG.md")
}

fn default_family_prefix() -> String {
  "stabby-".to_string()
}

fn default_publish_command() -> Vec<String> {
  vec!["cargo".to_string(), "publish".to_string()]
}

fn default_crates() -> Vec<CrateConfig> {
  vec![
    CrateConfig::at("stabby-macros"),
    CrateConfig::at("stabby-abi"),
    CrateConfig::at("stabby"),
  ]
}

impl Default for LockstepConfig {
  fn default() -> Self {
    Self {
      changelog: default_changelog(),
      family_prefix: default_family_prefix(),
      editor: None,
      publish_command: default_publish_command(),
      extra_manifests: Vec::new(),
      crates: default_crates(),
    }
  }
}

impl LockstepConfig {
  /// Find config file in search order
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("lockstep.toml"),
      path.join(".lockstep.toml"),
      path.join(".cargo").join("lockstep.toml"),
      path.join(".config").join("lockstep.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from lockstep.toml, or the built-in defaults when there is none
  pub fn load(path: &Path) -> LockstepResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path).map_err(|e| LockstepError::io(&config_path, e))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> LockstepResult<Self> {
    let config: LockstepConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Validate the configuration
  pub fn validate(&self) -> LockstepResult<()> {
    if self.crates.is_empty() {
      return Err(ConfigError::MissingField {
        field: "[[crates]]".to_string(),
      }
      .into());
    }

    let mut seen = HashSet::new();
    for krate in &self.crates {
      if krate.name.trim().is_empty() {
        return Err(ConfigError::MissingField {
          field: "name of a [[crates]] entry".to_string(),
        }
        .into());
      }
      if !seen.insert(krate.name.as_str()) {
        return Err(ConfigError::DuplicateCrate {
          name: krate.name.clone(),
        }
        .into());
      }
    }

    if self.publish_command.first().is_none_or(|program| program.trim().is_empty()) {
      return Err(ConfigError::MissingField {
        field: "publish_command".to_string(),
      }
      .into());
    }

    if self.family_prefix.is_empty() {
      return Err(ConfigError::MissingField {
        field: "family_prefix".to_string(),
      }
      .into());
    }

    Ok(())
  }

  /// Editor command line: config, then $VISUAL, then $EDITOR, then vi
  pub fn editor_command(&self) -> Vec<String> {
    resolve_editor(
      self.editor.as_deref(),
      std::env::var("VISUAL").ok().as_deref(),
      std::env::var("EDITOR").ok().as_deref(),
    )
  }
}

/// First non-blank candidate, split on whitespace; `vi` when all are blank
fn resolve_editor(configured: Option<&str>, visual: Option<&str>, editor: Option<&str>) -> Vec<String> {
  let chosen = [configured, visual, editor]
    .into_iter()
    .flatten()
    .find(|e| !e.trim().is_empty())
    .unwrap_or("vi");

  chosen.split_whitespace().map(str::to_string).collect()
}
