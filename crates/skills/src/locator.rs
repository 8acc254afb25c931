//! Locating the bundle shipped with the tool.
//!
//! Installed builds look for `<bin>/../share/modern-python-skill/skill` (or the directory named
//! by `MODERN_PYTHON_SKILL_BUNDLE`). Running from a source checkout falls back to the `skill/`
//! directory next to this crate's manifest.

use mpskill_core::{BUNDLE_DIR_NAME, Error, Result};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::cache::SkillCache;
use crate::copy::CopySummary;

/// Environment variable pointing at an installed bundle directory
pub const BUNDLE_ENV: &str = "MODERN_PYTHON_SKILL_BUNDLE";

/// Which location a bundle was installed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleOrigin {
    /// The installed (packaged) location
    Packaged,
    /// The source-tree fallback
    Fallback,
}

/// Result of [`BundleLocator::install`].
#[derive(Debug, Clone)]
pub struct InstalledBundle {
    pub origin: BundleOrigin,
    pub source: PathBuf,
    pub summary: CopySummary,
}

/// Finds the packaged bundle, with one fallback location.
#[derive(Debug)]
pub struct BundleLocator {
    primary: io::Result<PathBuf>,
    fallback: PathBuf,
}

impl BundleLocator {
    /// Build a locator from an already-resolved primary lookup and a fallback directory
    pub fn new(primary: io::Result<PathBuf>, fallback: impl Into<PathBuf>) -> Self {
        Self { primary, fallback: fallback.into() }
    }

    /// Locator for the bundle shipped with this build
    pub fn packaged() -> Self {
        Self::new(installed_bundle_dir(), source_tree_bundle_dir())
    }

    /// Replace the cache with the packaged bundle.
    ///
    /// The primary location is tried first. If its lookup failed, it does not exist, or copying
    /// from it fails, the fallback is tried once. When neither location exists the error is the
    /// primary failure if there was one, otherwise [`Error::BundleNotLocated`].
    pub fn install(&self, cache: &SkillCache) -> Result<InstalledBundle> {
        let primary_failure = match &self.primary {
            Ok(path) if path.is_dir() => match cache.replace_from(path) {
                Ok(summary) => {
                    return Ok(InstalledBundle { origin: BundleOrigin::Packaged, source: path.clone(), summary });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "copying packaged skills failed, retrying from fallback");
                    Some(e)
                }
            },
            Ok(path) => {
                debug!(path = %path.display(), "packaged skills not found, trying fallback");
                None
            }
            Err(e) => {
                warn!(error = %e, "packaged skill lookup failed, trying fallback");
                Some(Error::BundleLookup(e.to_string()))
            }
        };

        if self.fallback.is_dir() {
            let summary = cache.replace_from(&self.fallback)?;
            return Ok(InstalledBundle { origin: BundleOrigin::Fallback, source: self.fallback.clone(), summary });
        }

        Err(primary_failure.unwrap_or(Error::BundleNotLocated))
    }
}

fn installed_bundle_dir() -> io::Result<PathBuf> {
    if let Some(dir) = env::var_os(BUNDLE_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let exe = env::current_exe()?;
    let bin_dir = exe
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))?;
    Ok(bin_dir.join("..").join("share").join(BUNDLE_DIR_NAME).join("skill"))
}

fn source_tree_bundle_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("skill")
}
