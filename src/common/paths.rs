//! Workspace layout on disk
//!
//! Everything is relative to a workspace root (usually the current directory):
//! - `.ara/config.json` - the configuration document
//! - `generated/<millis>/<country>/<type>/` - recorded execution artifacts

use std::path::{Path, PathBuf};

/// Name of the workspace marker directory
pub const WORKSPACE_DIR: &str = ".ara";

/// Name of the configuration file inside the marker directory
pub const CONFIG_FILE: &str = "config.json";

/// Name of the directory holding recorded executions
pub const GENERATED_DIR: &str = "generated";

/// Name of the cycle definition written at the root of each version directory
pub const CYCLE_DEFINITION_FILE: &str = "cycleDefinition.json";

/// Resolved locations of a workspace
///
/// Passed explicitly to every component so tests can point at temp directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
    workspace_dir: String,
    config_file: String,
    generated_dir: String,
}

impl WorkspaceLayout {
    /// Standard layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            workspace_dir: WORKSPACE_DIR.to_string(),
            config_file: CONFIG_FILE.to_string(),
            generated_dir: GENERATED_DIR.to_string(),
        }
    }

    /// Override the marker directory name
    pub fn with_workspace_dir(mut self, name: impl Into<String>) -> Self {
        self.workspace_dir = name.into();
        self
    }

    /// Override the configuration file name
    pub fn with_config_file(mut self, name: impl Into<String>) -> Self {
        self.config_file = name.into();
        self
    }

    /// Override the generated output directory name
    pub fn with_generated_dir(mut self, name: impl Into<String>) -> Self {
        self.generated_dir = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.ara`
    pub fn workspace_dir(&self) -> PathBuf {
        self.root.join(&self.workspace_dir)
    }

    /// `<root>/.ara/config.json`
    pub fn config_path(&self) -> PathBuf {
        self.workspace_dir().join(&self.config_file)
    }

    /// `<root>/generated`
    pub fn generated_dir(&self) -> PathBuf {
        self.root.join(&self.generated_dir)
    }

    /// `<root>/generated/<millis>`
    pub fn version_dir(&self, version_millis: u64) -> PathBuf {
        self.generated_dir().join(version_millis.to_string())
    }

    /// `<root>/generated/<millis>/<country>/<type>`
    pub fn execution_dir(&self, version_millis: u64, country: &str, test_type: &str) -> PathBuf {
        self.version_dir(version_millis).join(country).join(test_type)
    }
}
