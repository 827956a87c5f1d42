//! Keeping a Cargo.toml in lockstep with the release version
//!
//! Two edits, nothing else:
//!
//! 1. set the manifest's own `version` (`[package]`, and `[workspace.package]`
//!    in a workspace root)
//! 2. set `version` on every dependency entry whose name (or `package = "..."`
//!    rename) starts with the family prefix
//!
//! Editing goes through `toml_edit`, so every byte outside the rewritten
//! values, including the whitespace and comments around them, is preserved.

use crate::core::error::LockstepResult;
use crate::release::version::Version;
use serde::Serialize;
use toml_edit::{DocumentMut, Item, TableLike, Value};

const DEPENDENCY_SECTIONS: [&str; 3] = ["dependencies", "dev-dependencies", "build-dependencies"];

/// One field rewritten by [`propagate_with_report`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUpdate {
  /// Dotted location, e.g. `package.version` or `dependencies.stabby-abi`
  pub field: String,
  pub from: String,
  pub to: String,
}

/// Result of propagating a version into one manifest
#[derive(Debug, Clone)]
pub struct Propagation {
  pub text: String,
  pub updates: Vec<FieldUpdate>,
}

impl Propagation {
  pub fn is_unchanged(&self) -> bool {
    self.updates.is_empty()
  }
}

/// Versions currently declared by a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestVersions {
  /// `(field, version)` for `package.version` and `workspace.package.version`
  pub own: Vec<(String, String)>,
  /// `(field, version)` for each family dependency that carries a version
  pub family: Vec<(String, String)>,
}

/// Propagate `version` into the manifest text
#[allow(dead_code)] // Text-only form of propagate_with_report, used in tests
pub fn propagate(manifest: &str, family_prefix: &str, version: &Version) -> LockstepResult<String> {
  propagate_with_report(manifest, family_prefix, version).map(|p| p.text)
}

/// Propagate `version` and report every field whose value changed
pub fn propagate_with_report(manifest: &str, family_prefix: &str, version: &Version) -> LockstepResult<Propagation> {
  let mut doc: DocumentMut = manifest.parse()?;
  let mut updates = Vec::new();
  let new_version = version.as_str();

  for (path, table) in own_version_tables(&mut doc) {
    if let Some(item) = table.get_mut("version")
      && let Some(from) = set_string(item, new_version)
    {
      updates.push(FieldUpdate {
        field: format!("{}.version", path),
        from,
        to: new_version.to_string(),
      });
    }
  }

  for (path, deps) in dependency_tables(&mut doc) {
    for (name, entry) in deps.iter_mut() {
      if !is_family_entry(name.get(), entry, family_prefix) {
        continue;
      }
      if let Some(from) = set_dependency_version(entry, new_version) {
        updates.push(FieldUpdate {
          field: format!("{}.{}", path, name.get()),
          from,
          to: new_version.to_string(),
        });
      }
    }
  }

  updates.retain(|u| u.from != u.to);

  // Nothing to change: hand back the input untouched
  let text = if updates.is_empty() {
    manifest.to_string()
  } else {
    doc.to_string()
  };

  Ok(Propagation { text, updates })
}

/// Read the own version and the family dependency versions of a manifest
pub fn read_manifest_versions(manifest: &str, family_prefix: &str) -> LockstepResult<ManifestVersions> {
  let mut doc: DocumentMut = manifest.parse()?;
  let mut versions = ManifestVersions::default();

  for (path, table) in own_version_tables(&mut doc) {
    if let Some(v) = table.get("version").and_then(|v| v.as_str()) {
      versions.own.push((format!("{}.version", path), v.to_string()));
    }
  }

  for (path, deps) in dependency_tables(&mut doc) {
    for (name, entry) in deps.iter_mut() {
      if !is_family_entry(name.get(), entry, family_prefix) {
        continue;
      }
      if let Some(v) = dependency_version(entry) {
        versions.family.push((format!("{}.{}", path, name.get()), v.to_string()));
      }
    }
  }

  Ok(versions)
}

/// Tables whose `version` key is the manifest's own version
fn own_version_tables(doc: &mut DocumentMut) -> Vec<(String, &mut dyn TableLike)> {
  let mut tables: Vec<(String, &mut dyn TableLike)> = Vec::new();
  let root = doc.as_table_mut();
  let (package, workspace) = split_two(root, "package", "workspace");

  if let Some(package) = package.and_then(Item::as_table_like_mut) {
    tables.push(("package".to_string(), package));
  }
  if let Some(ws_package) = workspace
    .and_then(Item::as_table_like_mut)
    .and_then(|ws| ws.get_mut("package"))
    .and_then(Item::as_table_like_mut)
  {
    tables.push(("workspace.package".to_string(), ws_package));
  }

  tables
}

/// Every dependency table of the manifest, with its dotted path
fn dependency_tables(doc: &mut DocumentMut) -> Vec<(String, &mut dyn TableLike)> {
  let mut tables: Vec<(String, &mut dyn TableLike)> = Vec::new();

  for (key, item) in doc.as_table_mut().iter_mut() {
    match key.get() {
      section if DEPENDENCY_SECTIONS.contains(&section) => {
        if let Some(deps) = item.as_table_like_mut() {
          tables.push((section.to_string(), deps));
        }
      }
      "workspace" => {
        if let Some(deps) = item
          .as_table_like_mut()
          .and_then(|ws| ws.get_mut("dependencies"))
          .and_then(Item::as_table_like_mut)
        {
          tables.push(("workspace.dependencies".to_string(), deps));
        }
      }
      "target" => {
        let Some(targets) = item.as_table_like_mut() else {
          continue;
        };
        for (cfg, target) in targets.iter_mut() {
          let cfg = cfg.get().to_string();
          let Some(target) = target.as_table_like_mut() else {
            continue;
          };
          for (section, deps) in target.iter_mut() {
            let section = section.get().to_string();
            if !DEPENDENCY_SECTIONS.contains(&section.as_str()) {
              continue;
            }
            if let Some(deps) = deps.as_table_like_mut() {
              tables.push((format!("target.{}.{}", cfg, section), deps));
            }
          }
        }
      }
      _ => {}
    }
  }

  tables
}

/// Borrow two distinct top-level items mutably at once
fn split_two<'a>(table: &'a mut toml_edit::Table, a: &str, b: &str) -> (Option<&'a mut Item>, Option<&'a mut Item>) {
  let mut first = None;
  let mut second = None;
  for (key, item) in table.iter_mut() {
    if key.get() == a {
      first = Some(item);
    } else if key.get() == b {
      second = Some(item);
    }
  }
  (first, second)
}

fn is_family_entry(name: &str, entry: &Item, family_prefix: &str) -> bool {
  if name.starts_with(family_prefix) {
    return true;
  }
  entry
    .as_table_like()
    .and_then(|t| t.get("package"))
    .and_then(|p| p.as_str())
    .is_some_and(|package| package.starts_with(family_prefix))
}

fn dependency_version(entry: &Item) -> Option<&str> {
  if let Some(v) = entry.as_str() {
    return Some(v);
  }
  entry.as_table_like()?.get("version")?.as_str()
}

/// Set the version of a dependency entry, returning the previous value
fn set_dependency_version(entry: &mut Item, version: &str) -> Option<String> {
  // name = "x.y.z"
  if entry.is_str() {
    return set_string(entry, version);
  }
  // name = { version = "x.y.z", ... } or [dependencies.name]
  let table = entry.as_table_like_mut()?;
  set_string(table.get_mut("version")?, version)
}

/// Replace a string value in place, keeping its decor. Returns the old value.
///
/// Equal values are not touched so their original quoting survives.
fn set_string(item: &mut Item, new: &str) -> Option<String> {
  let value = item.as_value_mut()?;
  let old = value.as_str()?.to_string();
  if old == new {
    return Some(old);
  }
  let decor = value.decor().clone();
  *value = Value::from(new);
  *value.decor_mut() = decor;
  Some(old)
}
