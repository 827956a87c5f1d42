//! Core plumbing shared by every command
//!
//! - **config**: lockstep.toml parsing and validation
//! - **context**: workspace root, configuration and resolved crate list
//! - **error**: error types with exit codes and contextual help messages
//! - **files**: reading, writing and diffing text files
//! - **tools**: the editor and publish command (`ExternalTools`)

pub mod config;
pub mod context;
pub mod error;
pub mod files;
pub mod tools;
