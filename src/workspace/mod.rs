//! Workspace lifecycle
//!
//! A workspace is a directory holding `.ara/config.json` and the `generated/`
//! tree of recorded executions.

pub mod execution;

use std::fs;
use std::path::PathBuf;

use crate::common::{Error, Result, WorkspaceLayout};
use crate::config::ConfigStore;

#[derive(Debug, Clone)]
pub struct Workspace {
    layout: WorkspaceLayout,
}

impl Workspace {
    pub fn new(layout: WorkspaceLayout) -> Self {
        Self { layout }
    }

    /// Workspace with the standard layout rooted at `root`
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self::new(WorkspaceLayout::new(root))
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// Whether the marker directory exists
    pub fn exists(&self) -> bool {
        self.layout.workspace_dir().is_dir()
    }

    /// Fail with `WorkspaceNotInitialized` unless the workspace exists
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(Error::WorkspaceNotInitialized(self.layout.workspace_dir()))
        }
    }

    /// Store for this workspace's configuration document
    pub fn config(&self) -> ConfigStore {
        ConfigStore::new(self.layout.config_path())
    }

    /// Create the workspace with an empty configuration
    pub fn init(&self) -> Result<()> {
        let dir = self.layout.workspace_dir();
        if dir.exists() {
            return Err(Error::WorkspaceAlreadyInitialized(dir));
        }
        self.create()
    }

    /// Delete the marker directory, then create it again
    ///
    /// Recorded executions under `generated/` are kept.
    pub fn reset(&self) -> Result<()> {
        let dir = self.layout.workspace_dir();
        if dir.exists() {
            tracing::info!(path = %dir.display(), "removing workspace");
            fs::remove_dir_all(&dir)?;
        }
        self.create()
    }

    fn create(&self) -> Result<()> {
        let dir = self.layout.workspace_dir();
        fs::create_dir_all(&dir).map_err(|e| Error::unwritable(&dir, e))?;
        self.config().create_empty()?;
        tracing::info!(path = %dir.display(), "workspace created");
        Ok(())
    }
}
