//! Wholesale directory replacement.

use mpskill_core::{Error, Result, resolve_path};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// What a [`replace_dir`] call wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    /// Regular files copied
    pub files: usize,
    /// Directories created below the destination root
    pub dirs: usize,
    /// Total bytes copied
    pub bytes: u64,
}

/// Replace `dst` with a recursive copy of `src`.
///
/// Anything already at `dst` is deleted first, so files absent from `src` do not survive.
/// Parent directories of `dst` are created as needed. Symlinks inside `src` are followed and
/// their targets copied. `src` and `dst` must not contain one another.
pub fn replace_dir(src: &Path, dst: &Path) -> Result<CopySummary> {
    let wrap = |e: io::Error| Error::copy(src, dst, e);

    if !src.is_dir() {
        return Err(wrap(io::Error::new(io::ErrorKind::NotFound, "source is not a directory")));
    }

    let (resolved_src, resolved_dst) = (resolve_path(src)?, resolve_path(dst)?);
    if resolved_dst.starts_with(&resolved_src) || resolved_src.starts_with(&resolved_dst) {
        return Err(wrap(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source and destination directories overlap",
        )));
    }

    remove_existing(dst).map_err(wrap)?;
    let summary = copy_tree(src, dst).map_err(wrap)?;

    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        files = summary.files,
        dirs = summary.dirs,
        bytes = summary.bytes,
        "directory replaced"
    );
    Ok(summary)
}

fn remove_existing(dst: &Path) -> io::Result<()> {
    match fs::symlink_metadata(dst) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(dst),
        Ok(_) => fs::remove_file(dst),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn copy_tree(src: &Path, dst: &Path) -> io::Result<CopySummary> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut summary = CopySummary::default();
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry.path().strip_prefix(src).map_err(io::Error::other)?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
            if entry.depth() > 0 {
                summary.dirs += 1;
            }
        } else {
            summary.bytes += fs::copy(entry.path(), &target)?;
            summary.files += 1;
        }
    }
    Ok(summary)
}
