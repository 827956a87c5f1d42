//! CLI commands for cargo-lockstep
//!
//! - **prepare**: edit the changelog, annotate its header, propagate the version
//! - **publish**: publish the crate family in order, stop at the first failure
//! - **check**: verify that the changelog header and manifests are in lockstep
//!
//! All commands accept `&ReleaseContext`; the ones that spawn processes go
//! through `&dyn ExternalTools`.

pub mod check;
pub mod prepare;
pub mod publish;

pub use check::run_check;
pub use prepare::{PrepareOptions, run_prepare};
pub use publish::run_publish;
