//! Artifact copying
//!
//! Copies single files, or mirrors whole directory trees while keeping
//! symlinks as symlinks and carrying owner and permission bits over to the
//! copies.

pub mod ownership;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};
use ownership::{Ownership, PlatformOwnership};

/// What a copy operation placed at the destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: u64,
    pub directories: u64,
    pub symlinks: u64,
    pub bytes: u64,
}

impl CopyStats {
    /// Stats of a single copied file
    pub fn file(bytes: u64) -> Self {
        Self {
            files: 1,
            bytes,
            ..Self::default()
        }
    }

    /// Accumulate another copy into this one
    pub fn add(&mut self, other: CopyStats) {
        self.files += other.files;
        self.directories += other.directories;
        self.symlinks += other.symlinks;
        self.bytes += other.bytes;
    }
}

/// Copies files and directory trees, preserving metadata
#[derive(Debug, Clone, Default)]
pub struct ArtifactCopier<O = PlatformOwnership> {
    ownership: O,
}

impl ArtifactCopier<PlatformOwnership> {
    /// Copier using the current platform's ownership model
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O: Ownership> ArtifactCopier<O> {
    pub fn with_ownership(ownership: O) -> Self {
        Self { ownership }
    }

    /// Copy the contents of `src` to `dst`, replacing any file or symlink at `dst`
    ///
    /// An existing `dst` entry is unlinked rather than truncated, so a stale
    /// symlink is never written through. Returns the number of bytes copied.
    pub fn copy_file(&self, src: &Path, dst: &Path) -> Result<u64> {
        let meta = fs::metadata(src).map_err(|e| source_error(src, e))?;
        if meta.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is a directory", src.display()),
            )));
        }

        let mut input = File::open(src).map_err(|e| source_error(src, e))?;
        clear_destination(dst, true).map_err(|e| Error::unwritable(dst, e))?;
        let mut output = File::create(dst).map_err(|e| Error::unwritable(dst, e))?;
        io::copy(&mut input, &mut output).map_err(|e| Error::unwritable(dst, e))
    }

    /// Mirror the tree under `src` into `dst`
    ///
    /// `dst` is created if missing and must not lie inside `src`. Stops at the
    /// first failing entry with [`Error::CopyAborted`]; whatever was already
    /// copied stays in place.
    pub fn copy_dir(&self, src: &Path, dst: &Path) -> Result<CopyStats> {
        let meta = fs::metadata(src).map_err(|e| source_error(src, e))?;
        if !meta.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a directory", src.display()),
            )));
        }
        ensure_outside(src, dst)?;
        fs::create_dir_all(dst).map_err(|e| Error::unwritable(dst, e))?;

        let mut stats = CopyStats::default();
        self.copy_tree(src, dst, &mut stats)?;

        tracing::debug!(
            src = %src.display(),
            dst = %dst.display(),
            files = stats.files,
            directories = stats.directories,
            symlinks = stats.symlinks,
            bytes = stats.bytes,
            "directory copied"
        );
        Ok(stats)
    }

    fn copy_tree(&self, src_dir: &Path, dst_dir: &Path, stats: &mut CopyStats) -> Result<()> {
        let entries = fs::read_dir(src_dir).map_err(|e| Error::copy_aborted(src_dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| Error::copy_aborted(src_dir, e))?;
            let src = entry.path();
            let dst = dst_dir.join(entry.file_name());
            let meta = fs::symlink_metadata(&src).map_err(|e| Error::copy_aborted(&src, e))?;
            let file_type = meta.file_type();

            if file_type.is_dir() {
                ensure_dir(&dst).map_err(|e| Error::copy_aborted(&dst, e))?;
                self.copy_tree(&src, &dst, stats)?;
                stats.directories += 1;
            } else if file_type.is_symlink() {
                let target = fs::read_link(&src).map_err(|e| Error::copy_aborted(&src, e))?;
                replace_symlink(&target, &dst).map_err(|e| Error::copy_aborted(&dst, e))?;
                stats.symlinks += 1;
            } else {
                clear_destination(&dst, false).map_err(|e| Error::copy_aborted(&dst, e))?;
                let bytes = self
                    .copy_file(&src, &dst)
                    .map_err(|e| Error::copy_aborted(&src, e))?;
                stats.add(CopyStats::file(bytes));
            }

            tracing::trace!(path = %dst.display(), "entry copied");
            self.propagate_metadata(&src, &dst, &meta)?;
        }
        Ok(())
    }

    /// Owner for every entry, permission bits for everything but symlinks
    fn propagate_metadata(&self, src: &Path, dst: &Path, meta: &fs::Metadata) -> Result<()> {
        let owner = self
            .ownership
            .owner(src)
            .map_err(|e| Error::copy_aborted(src, e))?;
        if let Some(owner) = owner {
            self.ownership
                .set_owner(dst, owner)
                .map_err(|e| Error::copy_aborted(dst, e))?;
        }

        if !meta.file_type().is_symlink() {
            fs::set_permissions(dst, meta.permissions())
                .map_err(|e| Error::copy_aborted(dst, e))?;
        }
        Ok(())
    }
}

/// Fail with `DestinationInsideSource` when `dst` is `src` or lies below it
///
/// Both paths are resolved through symlinks; `dst` need not exist yet.
pub fn ensure_outside(src: &Path, dst: &Path) -> Result<()> {
    let src_real = src.canonicalize().map_err(|e| source_error(src, e))?;
    let dst_real = resolve_destination(dst).map_err(|e| Error::unwritable(dst, e))?;
    if dst_real.starts_with(&src_real) {
        return Err(Error::DestinationInsideSource {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }
    Ok(())
}

/// Canonical form of a path whose trailing components may not exist yet
fn resolve_destination(dst: &Path) -> io::Result<PathBuf> {
    let mut base = dst;
    let mut missing = Vec::new();
    loop {
        if base.as_os_str().is_empty() {
            base = Path::new(".");
        }
        match base.canonicalize() {
            Ok(resolved) => {
                return Ok(missing
                    .iter()
                    .rev()
                    .fold(resolved, |path: PathBuf, name| path.join(name)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let name = base.file_name().ok_or(e)?;
                missing.push(name.to_os_string());
                base = base.parent().unwrap_or(Path::new(""));
            }
            Err(e) => return Err(e),
        }
    }
}

fn source_error(src: &Path, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::NotFound {
        Error::SourceNotFound(src.to_path_buf())
    } else {
        Error::Io(e)
    }
}

/// Remove the entry at `path` without following symlinks
///
/// A real directory is kept when `keep_dir` is set, removed otherwise.
fn clear_destination(path: &Path, keep_dir: bool) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            if keep_dir {
                Ok(())
            } else {
                fs::remove_dir_all(path)
            }
        }
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Create `path` as a real directory, replacing a file or symlink found there
fn ensure_dir(path: &Path) -> io::Result<()> {
    clear_destination(path, true)?;
    match fs::create_dir(path) {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        result => result,
    }
}

/// Create a symlink at `link`, replacing whatever entry was there
fn replace_symlink(target: &Path, link: &Path) -> io::Result<()> {
    clear_destination(link, false)?;
    create_symlink(target, link)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    let _ = (target, link);
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}
