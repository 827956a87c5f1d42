//! Integration tests for `cargo lockstep prepare`

use crate::helpers::{TestWorkspace, run_lockstep, run_lockstep_raw};
use anyhow::Result;

#[test]
fn test_prepare_annotates_changelog_and_manifests() -> Result<()> {
  let ws = TestWorkspace::new("# 1.3.0\n\n- new vtable layout\n\n# 0.9.0 (api=0.0.0, abi=2.0.0)\n")?;

  let output = run_lockstep(&ws.path, &["lockstep", "prepare"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("# 1.3.0 (api=0.0.0, abi=0.1.0)"));

  assert_eq!(
    ws.read_file("CHANGELOG.md")?,
    "# 1.3.0 (api=0.0.0, abi=0.1.0)\n\n- new vtable layout\n\n# 0.9.0 (api=0.0.0, abi=2.0.0)\n"
  );

  let abi = ws.read_file("stabby-abi/Cargo.toml")?;
  assert!(abi.contains("version = \"1.3.0\"\n"));
  assert!(abi.contains("stabby-macros = { path = \"../stabby-macros\", version = \"1.3.0\" }"));
  assert!(abi.contains("license = \"MIT\""));

  let stabby = ws.read_file("stabby/Cargo.toml")?;
  assert!(stabby.contains("stabby-abi = { path = \"../stabby-abi\", version = \"1.3.0\" }"));

  // The workspace root is not configured as an extra manifest
  assert!(!ws.read_file("Cargo.toml")?.contains("1.3.0"));

  Ok(())
}

#[test]
fn test_bare_invocation_runs_prepare() -> Result<()> {
  let ws = TestWorkspace::new("# 2.4.0\n")?;

  run_lockstep(&ws.path, &["lockstep"])?;

  assert_eq!(ws.read_file("CHANGELOG.md")?, "# 2.4.0 (api=1.2.0, abi=0.0.0)\n");
  assert!(ws.read_file("stabby/Cargo.toml")?.contains("version = \"2.4.0\"\n"));

  Ok(())
}

#[test]
fn test_bare_version_argument_is_released() -> Result<()> {
  let ws = TestWorkspace::new("# 0.9.0 (api=0.0.0, abi=2.0.0)\n- old\n")?;

  run_lockstep(&ws.path, &["lockstep", "1.0.0"])?;

  assert_eq!(
    ws.read_file("CHANGELOG.md")?,
    "# 1.0.0 (api=0.0.0, abi=0.0.0)\n\n# 0.9.0 (api=0.0.0, abi=2.0.0)\n- old\n"
  );
  assert!(ws.read_file("stabby-macros/Cargo.toml")?.contains("version = \"1.0.0\"\n"));

  Ok(())
}

#[test]
fn test_missing_version_exits_with_user_error() -> Result<()> {
  let ws = TestWorkspace::new("# Changelog\n\nUnreleased work.\n")?;
  let before = ws.read_file("stabby-abi/Cargo.toml")?;

  let output = run_lockstep_raw(&ws.path, &["lockstep", "prepare"])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("No pending version header"));
  assert_eq!(ws.read_file("stabby-abi/Cargo.toml")?, before);
  assert_eq!(ws.read_file("CHANGELOG.md")?, "# Changelog\n\nUnreleased work.\n");

  Ok(())
}

#[test]
fn test_dry_run_prints_diff_and_writes_nothing() -> Result<()> {
  let ws = TestWorkspace::new("# 1.3.0\n")?;
  let before = ws.read_file("stabby/Cargo.toml")?;

  let output = run_lockstep(&ws.path, &["lockstep", "prepare", "--dry-run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("-version = \"0.9.0\""));
  assert!(stdout.contains("+version = \"1.3.0\""));
  assert_eq!(ws.read_file("stabby/Cargo.toml")?, before);
  assert_eq!(ws.read_file("CHANGELOG.md")?, "# 1.3.0\n");

  Ok(())
}

#[test]
fn test_json_report() -> Result<()> {
  let ws = TestWorkspace::new("# 8.9.1\n")?;

  let output = run_lockstep(&ws.path, &["lockstep", "prepare", "--no-edit", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["version"], "8.9.1");
  assert_eq!(report["header"]["api"], "3.0.0");
  assert_eq!(report["header"]["abi"], "0.2.0");
  assert_eq!(report["manifests"].as_array().map(Vec::len), Some(3));
  assert_eq!(report["manifests"][1]["path"], "stabby-abi/Cargo.toml");

  Ok(())
}

#[test]
fn test_extra_manifests_follow_the_version() -> Result<()> {
  let ws = TestWorkspace::new("# 1.3.0\n")?;
  ws.write_file(
    "Cargo.toml",
    r#"[workspace]
members = ["stabby-macros", "stabby-abi", "stabby"]
resolver = "2"

[workspace.dependencies]
stabby = { path = "stabby", version = "0.9.0" }
serde = "1.0"
"#,
  )?;
  ws.write_config("editor = \"true\"\nextra_manifests = [\"Cargo.toml\"]\n")?;

  run_lockstep(&ws.path, &["lockstep", "prepare"])?;

  let root = ws.read_file("Cargo.toml")?;
  assert!(root.contains("stabby = { path = \"stabby\", version = \"1.3.0\" }"));
  assert!(root.contains("serde = \"1.0\""));

  Ok(())
}

#[test]
fn test_crates_without_path_are_found_through_cargo_metadata() -> Result<()> {
  let ws = TestWorkspace::new("# 1.3.0\n")?;
  ws.write_config(
    r#"editor = "true"
family_prefix = "stabby"

[[crates]]
name = "stabby-abi"

[[crates]]
name = "stabby"
"#,
  )?;

  run_lockstep(&ws.path, &["lockstep", "prepare"])?;

  assert!(ws.read_file("stabby/Cargo.toml")?.contains("version = \"1.3.0\"\n"));
  assert!(ws.read_file("stabby-abi/Cargo.toml")?.contains("version = \"1.3.0\" }"));
  // Not configured, so its own version stays put
  assert!(ws.read_file("stabby-macros/Cargo.toml")?.contains("version = \"0.9.0\"\n"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_editor_result_is_used() -> Result<()> {
  let ws = TestWorkspace::new("# Changelog\n")?;
  ws.write_file("editor.sh", "printf '# 3.0.0\\n- written in the editor\\n' > \"$1\"\n")?;
  ws.write_config("editor = \"sh editor.sh\"\n")?;

  run_lockstep(&ws.path, &["lockstep", "prepare"])?;

  assert_eq!(
    ws.read_file("CHANGELOG.md")?,
    "# 3.0.0 (api=0.0.0, abi=1.0.0)\n- written in the editor\n"
  );
  assert!(ws.read_file("stabby/Cargo.toml")?.contains("version = \"3.0.0\"\n"));

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_failing_editor_aborts() -> Result<()> {
  let ws = TestWorkspace::new("# 1.3.0\n")?;
  ws.write_config("editor = \"false\"\n")?;

  let output = run_lockstep_raw(&ws.path, &["lockstep", "prepare"])?;

  assert_eq!(output.status.code(), Some(3));
  assert_eq!(ws.read_file("CHANGELOG.md")?, "# 1.3.0\n");

  Ok(())
}

#[test]
fn test_words_after_bare_version_are_refused() -> Result<()> {
  let ws = TestWorkspace::new("# 0.9.0\n")?;
  let before = ws.read_file("stabby/Cargo.toml")?;

  let output = run_lockstep_raw(&ws.path, &["lockstep", "1.0.0", "--dry-run"])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("cargo lockstep prepare 1.0.0 --dry-run"));
  assert_eq!(ws.read_file("CHANGELOG.md")?, "# 0.9.0\n");
  assert_eq!(ws.read_file("stabby/Cargo.toml")?, before);

  Ok(())
}

#[test]
fn test_prepare_with_version_and_flags() -> Result<()> {
  let ws = TestWorkspace::new("# 0.9.0\n")?;

  let output = run_lockstep(&ws.path, &["lockstep", "prepare", "1.0.0", "--no-edit", "--json"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["version"], "1.0.0");
  assert!(ws.read_file("stabby/Cargo.toml")?.contains("version = \"1.0.0\"\n"));

  Ok(())
}
