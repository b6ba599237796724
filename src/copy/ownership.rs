//! File ownership propagation
//!
//! Unix: uid/gid from metadata, applied with `lchown` so symlinks are changed
//! themselves rather than their targets.
//! Other platforms: no ownership model, every operation is a no-op.

use std::io;
use std::path::Path;

/// User and group identifiers of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub uid: u32,
    pub gid: u32,
}

/// Read and apply ownership of filesystem entries
pub trait Ownership {
    /// Owner of `path` (not following symlinks), `None` if the platform has none
    fn owner(&self, path: &Path) -> io::Result<Option<Owner>>;

    /// Change the owner of `path` (not following symlinks)
    fn set_owner(&self, path: &Path, owner: Owner) -> io::Result<()>;
}

/// POSIX ownership
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixOwnership;

#[cfg(unix)]
impl Ownership for UnixOwnership {
    fn owner(&self, path: &Path) -> io::Result<Option<Owner>> {
        use std::os::unix::fs::MetadataExt;
        let meta = std::fs::symlink_metadata(path)?;
        Ok(Some(Owner {
            uid: meta.uid(),
            gid: meta.gid(),
        }))
    }

    fn set_owner(&self, path: &Path, owner: Owner) -> io::Result<()> {
        std::os::unix::fs::lchown(path, Some(owner.uid), Some(owner.gid))
    }
}

/// Ownership for platforms without POSIX owners
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOwnership;

impl Ownership for NoOwnership {
    fn owner(&self, _path: &Path) -> io::Result<Option<Owner>> {
        Ok(None)
    }

    fn set_owner(&self, _path: &Path, _owner: Owner) -> io::Result<()> {
        Ok(())
    }
}

/// Ownership implementation for the current platform
#[cfg(unix)]
pub type PlatformOwnership = UnixOwnership;

#[cfg(not(unix))]
pub type PlatformOwnership = NoOwnership;
