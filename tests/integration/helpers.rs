//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Records each published crate directory and its arguments; fails where a `FAIL` marker exists
pub const RECORDING_PUBLISH: &str = r#"publish_command = ["sh", "-c", 'if [ -e FAIL ]; then exit 1; fi; echo "$(basename "$PWD") $*" >> ../published.log', "sh"]"#;

/// A throwaway stabby-style workspace: three crates, a changelog and a lockstep.toml
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create the workspace with the default crate layout and `changelog`
  pub fn new(changelog: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(
      path.join("Cargo.toml"),
      r#"[workspace]
members = ["stabby-macros", "stabby-abi", "stabby"]
resolver = "2"
"#,
    )?;

    let ws = Self { _root: root, path };
    ws.add_crate("stabby-macros", &[])?;
    ws.add_crate("stabby-abi", &[("stabby-macros", "../stabby-macros")])?;
    ws.add_crate("stabby", &[("stabby-abi", "../stabby-abi")])?;
    ws.write_file("CHANGELOG.md", changelog)?;
    ws.write_config("editor = \"true\"\n")?;

    Ok(ws)
  }

  /// Add a crate at `dir` with family path dependencies
  pub fn add_crate(&self, dir: &str, deps: &[(&str, &str)]) -> Result<PathBuf> {
    let crate_path = self.path.join(dir);
    std::fs::create_dir_all(crate_path.join("src"))?;

    let name = Path::new(dir)
      .file_name()
      .and_then(|n| n.to_str())
      .context("crate dir has no name")?;
    let mut cargo_toml = format!(
      r#"[package]
name = "{}"
version = "0.9.0"
edition = "2021"
license = "MIT"

[dependencies]
"#,
      name
    );
    for (dep_name, dep_path) in deps {
      cargo_toml.push_str(&format!(
        "{} = {{ path = \"{}\", version = \"0.9.0\" }}\n",
        dep_name, dep_path
      ));
    }

    std::fs::write(crate_path.join("Cargo.toml"), cargo_toml)?;
    std::fs::write(crate_path.join("src/lib.rs"), format!("//! {} crate\n", name))?;

    Ok(crate_path)
  }

  /// Replace lockstep.toml
  pub fn write_config(&self, content: &str) -> Result<()> {
    self.write_file("lockstep.toml", content)
  }

  /// Write a file relative to the workspace root
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let path = self.path.join(path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run cargo-lockstep and return its output whatever the exit status
pub fn run_lockstep_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_cargo-lockstep");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run cargo-lockstep")
}

/// Run cargo-lockstep, failing on a non-zero exit status
pub fn run_lockstep(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_lockstep_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "cargo-lockstep command failed: cargo {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
