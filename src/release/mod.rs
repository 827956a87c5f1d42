//! Release version derivation
//!
//! Pure logic, no I/O and no processes:
//!
//! - **version**: dotted integer version that keeps its original text
//! - **factor**: api/abi compatibility counters derived from a version
//! - **changelog**: finds the pending version at the top of the changelog
//! - **header**: rewrites that header with its counters, idempotently
//!
//! # Example
//!
//! ```text
//! # 8.9.1                              ->  # 8.9.1 (api=3.0.0, abi=0.2.0)
//! ```

pub mod changelog;
pub mod factor;
pub mod header;
pub mod version;

pub use changelog::find_pending_version;
pub use header::{ChangelogHeader, insert_header, rewrite_header};
pub use version::Version;
