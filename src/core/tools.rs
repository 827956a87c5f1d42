//! External collaborators: the interactive editor and the publish command
//!
//! Both are plain blocking child processes with inherited stdio. There is no
//! timeout: the editor wait lasts until the human closes it. Only the exit
//! status of the publish command is consulted.

use crate::core::config::LockstepConfig;
use crate::core::error::{LockstepError, LockstepResult, ReleaseError};
use std::path::Path;
use std::process::Command;

/// Exit status of an external command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
  Success,
  /// Non-zero exit code, or `None` when terminated by a signal
  Failed(Option<i32>),
}

impl ToolStatus {
  pub fn success(self) -> bool {
    matches!(self, ToolStatus::Success)
  }

  pub fn code(self) -> Option<i32> {
    match self {
      ToolStatus::Success => Some(0),
      ToolStatus::Failed(code) => code,
    }
  }
}

impl From<std::process::ExitStatus> for ToolStatus {
  fn from(status: std::process::ExitStatus) -> Self {
    if status.success() {
      ToolStatus::Success
    } else {
      ToolStatus::Failed(status.code())
    }
  }
}

/// The processes a release run depends on
pub trait ExternalTools {
  /// Open `file` in the editor and block until the editor exits
  fn edit(&self, file: &Path) -> LockstepResult<()>;

  /// Run the publish command inside `crate_dir` with `extra_args` appended
  fn publish(&self, crate_dir: &Path, extra_args: &[String]) -> LockstepResult<ToolStatus>;
}

/// Real editor and publish command
pub struct SystemTools {
  editor: Vec<String>,
  publish_command: Vec<String>,
}

impl SystemTools {
  pub fn new(editor: Vec<String>, publish_command: Vec<String>) -> Self {
    Self {
      editor,
      publish_command,
    }
  }

  pub fn from_config(config: &LockstepConfig) -> Self {
    Self::new(config.editor_command(), config.publish_command.clone())
  }
}

/// Split `[program, args...]` into a `Command`
fn command_from(parts: &[String], what: &str) -> LockstepResult<Command> {
  let (program, args) = parts
    .split_first()
    .ok_or_else(|| LockstepError::message(format!("No {} command configured", what)))?;
  let mut cmd = Command::new(program);
  cmd.args(args);
  Ok(cmd)
}

impl ExternalTools for SystemTools {
  fn edit(&self, file: &Path) -> LockstepResult<()> {
    let status = command_from(&self.editor, "editor")?.arg(file).status().map_err(|e| {
      LockstepError::with_help(
        format!("Failed to launch editor `{}`: {}", self.editor.join(" "), e),
        "Set `editor` in lockstep.toml, or $VISUAL / $EDITOR",
      )
    })?;

    match ToolStatus::from(status) {
      ToolStatus::Success => Ok(()),
      ToolStatus::Failed(code) => Err(
        ReleaseError::EditorFailed {
          command: self.editor.join(" "),
          code,
        }
        .into(),
      ),
    }
  }

  fn publish(&self, crate_dir: &Path, extra_args: &[String]) -> LockstepResult<ToolStatus> {
    let status = command_from(&self.publish_command, "publish")?
      .args(extra_args)
      .current_dir(crate_dir)
      .status()
      .map_err(|e| {
        LockstepError::io(
          crate_dir,
          std::io::Error::new(
            e.kind(),
            format!("failed to run `{}`: {}", self.publish_command.join(" "), e),
          ),
        )
      })?;

    Ok(status.into())
  }
}
