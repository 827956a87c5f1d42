//! Compatibility counters derived from a version
//!
//! Each version component is reduced to the number of times it divides evenly
//! by a base. The result is a lossy annotation, never used for ordering.

use crate::release::version::Version;

/// Base of the "api" counter
pub const API_BASE: u64 = 2;

/// Base of the "abi" counter
pub const ABI_BASE: u64 = 3;

/// Count how many times `component` divides evenly by `base`.
///
/// Division stops once the quotient is 1 or less, or stops dividing evenly.
/// Bases below 2 always yield 0.
pub fn factor(mut component: u64, base: u64) -> u32 {
  if base < 2 {
    return 0;
  }

  let mut count = 0;
  while component > 1 && component % base == 0 {
    component /= base;
    count += 1;
  }
  count
}

/// Apply [`factor`] to every component and join the counts with `.`
pub fn factor_version(version: &Version, base: u64) -> String {
  version
    .components()
    .iter()
    .map(|&component| factor(component, base).to_string())
    .collect::<Vec<_>>()
    .join(".")
}
