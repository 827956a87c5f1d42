//! Lockstep check: is every file already at the changelog's version?
//!
//! Read-only. Fails with `OutOfSync` when the header annotation is stale or a
//! manifest declares a different version.

use crate::cargo::manifest::read_manifest_versions;
use crate::core::context::ReleaseContext;
use crate::core::error::{LockstepResult, ReleaseError, ResultExt};
use crate::core::files::read_text;
use crate::release::{ChangelogHeader, Version, find_pending_version, rewrite_header};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
  pub version: Version,
  pub header: ChangelogHeader,
  pub header_current: bool,
  pub manifests: Vec<ManifestCheck>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestCheck {
  pub path: String,
  pub own: Option<String>,
  /// `(field, declared version)` for every field not at the release version
  pub stale: Vec<(String, String)>,
}

impl CheckReport {
  pub fn in_sync(&self) -> bool {
    self.header_current && self.manifests.iter().all(|m| m.stale.is_empty())
  }
}

/// Check that the changelog header and every manifest are in lockstep
pub fn run_check(ctx: &ReleaseContext, json: bool) -> LockstepResult<CheckReport> {
  let changelog_path = ctx.changelog_path();
  let changelog = read_text(&changelog_path)?;
  let version = find_pending_version(&changelog).ok_or_else(|| ReleaseError::VersionNotFound {
    changelog: changelog_path.clone(),
  })?;

  let header = ChangelogHeader::for_version(&version);
  let header_current = rewrite_header(&changelog, &version) == changelog;

  let mut manifests = Vec::new();
  let mut out_of_sync = Vec::new();
  if !header_current {
    out_of_sync.push(changelog_path);
  }

  for manifest_path in ctx.manifest_paths() {
    let label = ctx.display_path(&manifest_path);
    let text = read_text(&manifest_path)?;
    let versions = read_manifest_versions(&text, &ctx.config.family_prefix)
      .with_context(|| format!("While reading {}", label))?;

    let own = versions.own.first().map(|(_, declared)| declared.clone());
    let stale: Vec<(String, String)> = versions
      .own
      .into_iter()
      .chain(versions.family)
      .filter(|(_, declared)| declared != version.as_str())
      .collect();

    if !stale.is_empty() {
      out_of_sync.push(manifest_path);
    }
    manifests.push(ManifestCheck {
      path: label,
      own,
      stale,
    });
  }

  let report = CheckReport {
    version,
    header,
    header_current,
    manifests,
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(ctx, &report);
  }

  if out_of_sync.is_empty() {
    Ok(report)
  } else {
    Err(ReleaseError::OutOfSync { files: out_of_sync }.into())
  }
}

fn print_report(ctx: &ReleaseContext, report: &CheckReport) {
  println!("🔍 Checking lockstep for {}", report.version);
  println!();

  let changelog = ctx.display_path(&ctx.changelog_path());
  if report.header_current {
    println!("   ✅ {}", changelog);
  } else {
    println!("   ❌ {}: header should read `{}`", changelog, report.header);
  }

  for manifest in &report.manifests {
    if manifest.stale.is_empty() {
      println!("   ✅ {}", manifest.path);
      continue;
    }
    println!("   ❌ {}", manifest.path);
    for (field, declared) in &manifest.stale {
      println!("      {} = {} (expected {})", field, declared, report.version);
    }
  }

  println!();
  if report.in_sync() {
    println!("✅ All files in lockstep");
  }
}
