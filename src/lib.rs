//! ARA CLI - records test-execution artifacts into a local workspace
//!
//! This library holds the configuration store, the artifact copier and the
//! workspace operations behind the `ara` binary.

pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod copy;
pub mod workspace;

// Re-export commonly used types for tests
pub use common::{Error, Result, WorkspaceLayout};
pub use config::{Config, ConfigStore};
pub use copy::{ArtifactCopier, CopyStats};
pub use workspace::execution::{ExecutionRecord, ExecutionRequest};
pub use workspace::Workspace;
