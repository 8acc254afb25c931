use mpskill_core::{PreconditionError, Result, SkillHome};
use std::path::{Path, PathBuf};

use crate::copy::{CopySummary, replace_dir};

/// The single local copy of the bundle that projects are filled from.
#[derive(Debug, Clone)]
pub struct SkillCache {
    dir: PathBuf,
}

impl SkillCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache at `<home>/skill`
    pub fn for_home(home: &SkillHome) -> Self {
        Self::new(home.skill_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.exists()
    }

    /// Fail with a hint to run `init` when the cache was never populated
    pub fn require(&self) -> Result<()> {
        if self.exists() { Ok(()) } else { Err(PreconditionError::CacheMissing(self.dir.clone()).into()) }
    }

    /// Replace the cache wholesale with the bundle at `source`
    pub fn replace_from(&self, source: &Path) -> Result<CopySummary> {
        replace_dir(source, &self.dir)
    }

    /// Replace `destination` wholesale with the cached bundle
    pub fn install_into(&self, destination: &Path) -> Result<CopySummary> {
        self.require()?;
        replace_dir(&self.dir, destination)
    }
}
