use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Per-user directory holding config, cache and logs
pub const HOME_DIR_NAME: &str = ".modern-python-skill";

/// Config document filename within the home directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Skill cache subdirectory within the home directory
pub const SKILL_DIR: &str = "skill";

/// Log subdirectory within the home directory
pub const LOGS_DIR: &str = "logs";

/// Directory name the bundle takes inside a project
pub const BUNDLE_DIR_NAME: &str = "modern-python-skill";

/// Intermediate directory `sync` places the bundle under
pub const SYNC_PARENT_DIR: &str = "skill";

/// Remote repository the bundle is published from
pub const DEFAULT_SOURCE_URL: &str = "https://github.com/ChengJiale150/modern-python-skill";

/// Layout of the per-user home directory.
///
/// ```text
/// ~/.modern-python-skill/
/// ├── config.yaml
/// ├── skill/        (skill cache)
/// └── logs/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillHome {
    root: PathBuf,
}

impl SkillHome {
    /// Create a layout rooted at an explicit directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default home directory under the user's home
    pub fn default_root() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(HOME_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn skill_dir(&self) -> PathBuf {
        self.root.join(SKILL_DIR)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    /// Create the home directory if missing
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }
}

/// Where `add` places the bundle: `<root>/modern-python-skill`
pub fn add_destination(project_root: &Path) -> PathBuf {
    project_root.join(BUNDLE_DIR_NAME)
}

/// Where `sync` places the bundle: `<root>/skill/modern-python-skill`
///
/// Differs from [`add_destination`]; existing projects rely on both layouts.
pub fn sync_destination(project_root: &Path) -> PathBuf {
    project_root.join(SYNC_PARENT_DIR).join(BUNDLE_DIR_NAME)
}

/// Make `path` absolute and resolve symlinks the way the OS would read it.
///
/// The longest prefix that exists is canonicalized. Components past it are appended with `.` and
/// `..` applied lexically, so the path does not need to exist yet.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let components: Vec<Component<'_>> = absolute.components().collect();

    for split in (1..=components.len()).rev() {
        let prefix: PathBuf = components[..split].iter().collect();
        if let Ok(mut resolved) = fs::canonicalize(&prefix) {
            resolved.extend(&components[split..]);
            return Ok(normalize(&resolved));
        }
    }
    Ok(normalize(&absolute))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(out.components().next_back(), Some(Component::RootDir | Component::Prefix(_)) | None) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
