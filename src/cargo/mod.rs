//! Cargo manifest integration
//!
//! - **manifest**: propagate the release version into a Cargo.toml, losslessly

pub mod manifest;
