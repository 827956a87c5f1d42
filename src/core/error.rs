//! Error types for cargo-lockstep with contextual messages and exit codes
//!
//! Every error maps to one exit code and, where the fix is not obvious from the
//! message alone, carries a help line pointing the user at the next step.

use crate::release::version::VersionParseError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for cargo-lockstep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, changelog without a pending version, invalid args)
  User = 1,
  /// System error (I/O, commands that could not be spawned)
  System = 2,
  /// Release failure (publish or editor failed, workspace out of lockstep)
  Release = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for cargo-lockstep
#[derive(Debug)]
pub enum LockstepError {
  /// Configuration errors
  Config(ConfigError),

  /// Release flow errors (changelog, editor, publish)
  Release(ReleaseError),

  /// A version string that is not a dotted list of integers
  InvalidVersion(VersionParseError),

  /// I/O errors, with the file involved when known
  Io { path: Option<PathBuf>, source: io::Error },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl LockstepError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    LockstepError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    LockstepError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// I/O failure on a specific file
  pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    LockstepError::Io {
      path: Some(path.into()),
      source,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      LockstepError::Message { message, context, help } => LockstepError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      LockstepError::Config(_) => ExitCode::User,
      LockstepError::Release(e) => e.exit_code(),
      LockstepError::InvalidVersion(_) => ExitCode::User,
      LockstepError::Io { .. } => ExitCode::System,
      LockstepError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      LockstepError::Config(e) => e.help_message(),
      LockstepError::Release(e) => e.help_message(),
      LockstepError::InvalidVersion(_) => {
        Some("Versions are dot-separated non-negative integers, e.g. 1.4.0".to_string())
      }
      LockstepError::Message { help, .. } => help.clone(),
      LockstepError::Io { .. } => None,
    }
  }
}

impl fmt::Display for LockstepError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LockstepError::Config(e) => write!(f, "{}", e),
      LockstepError::Release(e) => write!(f, "{}", e),
      LockstepError::InvalidVersion(e) => write!(f, "{}", e),
      LockstepError::Io { path: Some(path), source } => {
        write!(f, "I/O error on {}: {}", path.display(), source)
      }
      LockstepError::Io { path: None, source } => write!(f, "I/O error: {}", source),
      LockstepError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for LockstepError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      LockstepError::Io { source, .. } => Some(source),
      LockstepError::InvalidVersion(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for LockstepError {
  fn from(err: io::Error) -> Self {
    LockstepError::Io { path: None, source: err }
  }
}

impl From<String> for LockstepError {
  fn from(msg: String) -> Self {
    LockstepError::message(msg)
  }
}

impl From<&str> for LockstepError {
  fn from(msg: &str) -> Self {
    LockstepError::message(msg)
  }
}

impl From<ConfigError> for LockstepError {
  fn from(err: ConfigError) -> Self {
    LockstepError::Config(err)
  }
}

impl From<ReleaseError> for LockstepError {
  fn from(err: ReleaseError) -> Self {
    LockstepError::Release(err)
  }
}

impl From<VersionParseError> for LockstepError {
  fn from(err: VersionParseError) -> Self {
    LockstepError::InvalidVersion(err)
  }
}

impl From<toml_edit::TomlError> for LockstepError {
  fn from(err: toml_edit::TomlError) -> Self {
    LockstepError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for LockstepError {
  fn from(err: toml_edit::de::Error) -> Self {
    LockstepError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<cargo_metadata::Error> for LockstepError {
  fn from(err: cargo_metadata::Error) -> Self {
    LockstepError::message(format!("Cargo metadata error: {}", err))
  }
}

impl From<serde_json::Error> for LockstepError {
  fn from(err: serde_json::Error) -> Self {
    LockstepError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A required list or value is empty
  MissingField { field: String },

  /// The same crate appears twice in `[[crates]]`
  DuplicateCrate { name: String },

  /// A crate without `path` is not a member of the cargo workspace
  CrateNotFound { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingField { field } => Some(format!("Set `{}` in lockstep.toml.", field)),
      ConfigError::DuplicateCrate { .. } => {
        Some("Each crate may appear once in `[[crates]]`; the list order is the publish order.".to_string())
      }
      ConfigError::CrateNotFound { name } => Some(format!(
        "Add `path = \"...\"` to the `[[crates]]` entry for '{}' or add it to the workspace members.",
        name
      )),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingField { field } => write!(f, "Missing required field in config: {}", field),
      ConfigError::DuplicateCrate { name } => write!(f, "Crate '{}' is listed more than once", name),
      ConfigError::CrateNotFound { name } => write!(f, "Crate '{}' not found in workspace", name),
    }
  }
}

/// Release flow errors
#[derive(Debug)]
pub enum ReleaseError {
  /// No line of the changelog carries a pending version header
  VersionNotFound { changelog: PathBuf },

  /// The editor exited unsuccessfully
  EditorFailed { command: String, code: Option<i32> },

  /// The publish command failed for a crate
  PublishFailed {
    crate_name: String,
    code: Option<i32>,
    /// Crates already published during this run (never rolled back)
    published: Vec<String>,
  },

  /// `check` found files that are not in lockstep with the changelog
  OutOfSync { files: Vec<PathBuf> },
}

impl ReleaseError {
  fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::VersionNotFound { .. } => ExitCode::User,
      ReleaseError::EditorFailed { .. } | ReleaseError::PublishFailed { .. } | ReleaseError::OutOfSync { .. } => {
        ExitCode::Release
      }
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::VersionNotFound { changelog } => Some(format!(
        "Start {} with a header such as `# 1.4.0` and run the release again.",
        changelog.display()
      )),
      ReleaseError::EditorFailed { .. } => {
        Some("Nothing was changed. Set `editor` in lockstep.toml or $EDITOR to a blocking editor.".to_string())
      }
      ReleaseError::PublishFailed { published, .. } if published.is_empty() => {
        Some("Nothing was published. Fix the failure and re-run `cargo lockstep publish`.".to_string())
      }
      ReleaseError::PublishFailed { published, .. } => Some(format!(
        "Already published (not rolled back): {}. Re-running publish will retry them; \
         the registry rejects versions it already has.",
        published.join(", ")
      )),
      ReleaseError::OutOfSync { .. } => Some("Run `cargo lockstep prepare --no-edit` to propagate the version.".to_string()),
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::VersionNotFound { changelog } => {
        write!(f, "No pending version header found in {}", changelog.display())
      }
      ReleaseError::EditorFailed { command, code } => {
        write!(f, "Editor `{}` exited with {}", command, describe_code(*code))
      }
      ReleaseError::PublishFailed { crate_name, code, .. } => {
        write!(f, "Failed to publish {} (exit {})", crate_name, describe_code(*code))
      }
      ReleaseError::OutOfSync { files } => {
        write!(f, "{} file(s) not in lockstep with the changelog:", files.len())?;
        for file in files {
          write!(f, "\n  {}", file.display())?;
        }
        Ok(())
      }
    }
  }
}

fn describe_code(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("status {}", code),
    None => "no status (terminated by signal)".to_string(),
  }
}

/// Result type alias for cargo-lockstep
pub type LockstepResult<T> = Result<T, LockstepError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> LockstepResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<LockstepError>,
{
  fn with_context<F>(self, f: F) -> LockstepResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &LockstepError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
