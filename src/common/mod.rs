//! Common utilities shared by every command

pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};
pub use paths::WorkspaceLayout;
