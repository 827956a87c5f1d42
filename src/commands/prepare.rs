//! Release preparation: edit the changelog, annotate its header, propagate the version
//!
//! Nothing is written before a version is known. Once it is, the changelog is
//! written first and then each manifest in crate order; a failure part way
//! leaves the files already written as they are.

use crate::cargo::manifest::{FieldUpdate, propagate_with_report};
use crate::core::context::ReleaseContext;
use crate::core::error::{LockstepResult, ReleaseError, ResultExt};
use crate::core::files::{read_text, unified_diff, write_text};
use crate::core::tools::ExternalTools;
use crate::release::{ChangelogHeader, Version, find_pending_version, insert_header, rewrite_header};
use serde::Serialize;

/// How a prepare run behaves
#[derive(Debug, Clone, Default)]
pub struct PrepareOptions {
  /// Release this version instead of reading it from the changelog (skips the editor)
  pub version: Option<Version>,
  /// Open the changelog in the editor first
  pub edit: bool,
  /// Print diffs instead of writing
  pub dry_run: bool,
  /// Print the report as JSON instead of progress lines
  pub json: bool,
}

/// What a prepare run did (or would do, in dry-run mode)
#[derive(Debug, Clone, Serialize)]
pub struct PrepareReport {
  pub version: Version,
  pub header: ChangelogHeader,
  pub changelog_changed: bool,
  pub manifests: Vec<ManifestChange>,
  pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestChange {
  pub path: String,
  pub updates: Vec<FieldUpdate>,
}

/// Run release preparation
pub fn run_prepare(ctx: &ReleaseContext, tools: &dyn ExternalTools, opts: PrepareOptions) -> LockstepResult<PrepareReport> {
  let changelog_path = ctx.changelog_path();
  let changelog_label = ctx.display_path(&changelog_path);
  let say = |line: String| {
    if !opts.json {
      println!("{}", line);
    }
  };

  if opts.edit && opts.version.is_none() {
    say(format!("📝 Waiting for the editor to close {}...", changelog_label));
    tools.edit(&changelog_path)?;
  }

  let changelog = read_text(&changelog_path)?;
  let pending = find_pending_version(&changelog);

  let (version, annotated) = match (opts.version, pending) {
    (Some(wanted), Some(found)) if wanted == found => {
      let annotated = rewrite_header(&changelog, &wanted);
      (wanted, annotated)
    }
    (Some(wanted), _) => {
      let annotated = insert_header(&changelog, &wanted);
      (wanted, annotated)
    }
    (None, Some(found)) => {
      let annotated = rewrite_header(&changelog, &found);
      (found, annotated)
    }
    (None, None) => {
      return Err(
        ReleaseError::VersionNotFound {
          changelog: changelog_path,
        }
        .into(),
      );
    }
  };

  if version.to_semver().is_none() {
    eprintln!(
      "⚠️  {} is not a MAJOR.MINOR.PATCH version; cargo will refuse to publish it",
      version
    );
  }

  let header = ChangelogHeader::for_version(&version);
  say(format!("🔖 Release {}", header));
  say(String::new());

  let changelog_changed = annotated != changelog;
  if changelog_changed {
    if opts.dry_run {
      say(unified_diff(&changelog_label, &changelog, &annotated));
    } else {
      write_text(&changelog_path, &annotated)?;
    }
    say(format!("   ✅ {}: header annotated", changelog_label));
  } else {
    say(format!("   ⏭️  {}: header already current", changelog_label));
  }

  let mut manifests = Vec::new();
  for manifest_path in ctx.manifest_paths() {
    let label = ctx.display_path(&manifest_path);
    let current = read_text(&manifest_path)?;
    let propagation = propagate_with_report(&current, &ctx.config.family_prefix, &version)
      .with_context(|| format!("While updating {}", label))?;

    if propagation.is_unchanged() {
      say(format!("   ⏭️  {}: already at {}", label, version));
    } else {
      if opts.dry_run {
        say(unified_diff(&label, &current, &propagation.text));
      } else {
        write_text(&manifest_path, &propagation.text)?;
      }
      let fields: Vec<_> = propagation
        .updates
        .iter()
        .map(|u| format!("{} {} → {}", u.field, u.from, u.to))
        .collect();
      say(format!("   ✅ {}: {}", label, fields.join(", ")));
    }

    manifests.push(ManifestChange {
      path: label,
      updates: propagation.updates,
    });
  }

  say(String::new());
  if opts.dry_run {
    say("🔍 Dry-run mode (no files written)".to_string());
  } else {
    say(format!("✅ Workspace prepared for {}", version));
    say(String::new());
    say("Next steps:".to_string());
    say("  cargo lockstep check".to_string());
    say("  cargo lockstep publish".to_string());
  }

  let report = PrepareReport {
    version,
    header,
    changelog_changed,
    manifests,
    dry_run: opts.dry_run,
  };

  if opts.json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  }

  Ok(report)
}
