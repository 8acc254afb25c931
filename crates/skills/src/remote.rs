//! Refreshing the cache from a remote repository.

use mpskill_core::{RemoteError, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::cache::SkillCache;
use crate::copy::CopySummary;

/// Bundle locations inside a clone, in search order
pub const BUNDLE_CANDIDATES: &[&str] = &["skill", "src/modern_python_skill/skill"];

/// Clones a repository into a local directory.
pub trait RepoFetcher {
    /// Clone `url` into the existing, empty directory `into`
    fn fetch(&self, url: &str, into: &Path) -> Result<()>;
}

impl<F> RepoFetcher for F
where
    F: Fn(&str, &Path) -> Result<()>,
{
    fn fetch(&self, url: &str, into: &Path) -> Result<()> {
        self(url, into)
    }
}

/// Fetcher backed by libgit2
#[derive(Debug, Clone, Copy, Default)]
pub struct GitFetcher;

impl RepoFetcher for GitFetcher {
    fn fetch(&self, url: &str, into: &Path) -> Result<()> {
        git2::Repository::clone(url, into).map_err(|e| RemoteError::clone_failed(url, e.message()))?;
        Ok(())
    }
}

/// First candidate directory that exists under `clone_root`
pub fn find_bundle(clone_root: &Path) -> Option<PathBuf> {
    BUNDLE_CANDIDATES
        .iter()
        .map(|candidate| clone_root.join(candidate))
        .find(|path| path.is_dir())
}

/// Clone `url` into a temporary directory and replace the cache with the bundle found there.
///
/// The temporary directory is removed when this returns, on success or failure. The cache is
/// only touched once a bundle directory has been found.
pub fn fetch_bundle(fetcher: &dyn RepoFetcher, url: &str, cache: &SkillCache) -> Result<CopySummary> {
    let temp = TempDir::new()?;
    info!(url, "cloning skills repository");
    fetcher.fetch(url, temp.path())?;

    let found = find_bundle(temp.path()).ok_or_else(|| RemoteError::BundleNotFound { url: url.to_string() })?;
    debug!(path = %found.display(), "found skills in clone");

    cache.replace_from(&found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpskill_core::Error;
    use std::cell::RefCell;
    use std::fs;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_find_bundle_order() {
        let temp = TempDir::new().unwrap();
        assert_eq!(find_bundle(temp.path()), None);

        let nested = temp.path().join("src").join("modern_python_skill").join("skill");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_bundle(temp.path()), Some(nested));

        let top = temp.path().join("skill");
        fs::create_dir_all(&top).unwrap();
        assert_eq!(find_bundle(temp.path()), Some(top));
    }

    #[test]
    fn test_find_bundle_ignores_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("skill"), "not a dir").unwrap();
        assert_eq!(find_bundle(temp.path()), None);
    }

    #[test]
    fn test_fetch_bundle_success() {
        let temp = TempDir::new().unwrap();
        let cache = SkillCache::new(temp.path().join("skill"));
        write(&cache.dir().join("old.txt"), "old");

        let fetcher = |_url: &str, into: &Path| -> Result<()> {
            write(&into.join("skill").join("new_skill.txt"), "new content");
            Ok(())
        };

        let summary = fetch_bundle(&fetcher, "https://example.com/repo", &cache).unwrap();
        assert_eq!(summary.files, 1);
        assert_eq!(
            fs::read_to_string(cache.dir().join("new_skill.txt")).unwrap(),
            "new content"
        );
        assert!(!cache.dir().join("old.txt").exists());
    }

    #[test]
    fn test_fetch_bundle_clone_failure() {
        let temp = TempDir::new().unwrap();
        let cache = SkillCache::new(temp.path().join("skill"));
        let fetcher = |url: &str, _into: &Path| -> Result<()> { Err(RemoteError::clone_failed(url, "failed").into()) };

        let err = fetch_bundle(&fetcher, "https://example.com/repo", &cache).unwrap_err();
        assert!(matches!(err, Error::Remote(RemoteError::Clone { .. })));
        assert!(err.to_string().contains("error cloning repository"));
        assert!(!cache.exists());
    }

    #[test]
    fn test_fetch_bundle_missing_skill_dir_keeps_cache() {
        let temp = TempDir::new().unwrap();
        let cache = SkillCache::new(temp.path().join("skill"));
        write(&cache.dir().join("current.txt"), "current");

        let fetcher = |_url: &str, into: &Path| -> Result<()> {
            write(&into.join("README.md"), "no bundle here");
            Ok(())
        };

        let err = fetch_bundle(&fetcher, "https://example.com/repo", &cache).unwrap_err();
        assert!(err.to_string().contains("could not find"));
        assert_eq!(fs::read_to_string(cache.dir().join("current.txt")).unwrap(), "current");
    }

    #[test]
    fn test_fetch_bundle_removes_temp_dir() {
        let temp = TempDir::new().unwrap();
        let cache = SkillCache::new(temp.path().join("skill"));
        let seen: RefCell<Vec<PathBuf>> = RefCell::new(Vec::new());

        let ok_fetcher = |_url: &str, into: &Path| -> Result<()> {
            seen.borrow_mut().push(into.to_path_buf());
            write(&into.join("skill").join("a.txt"), "a");
            Ok(())
        };
        fetch_bundle(&ok_fetcher, "u", &cache).unwrap();

        let failing_fetcher = |url: &str, into: &Path| -> Result<()> {
            seen.borrow_mut().push(into.to_path_buf());
            write(&into.join("partial.txt"), "partial");
            Err(RemoteError::clone_failed(url, "network").into())
        };
        assert!(fetch_bundle(&failing_fetcher, "u", &cache).is_err());

        let empty_fetcher = |_url: &str, into: &Path| -> Result<()> {
            seen.borrow_mut().push(into.to_path_buf());
            Ok(())
        };
        assert!(fetch_bundle(&empty_fetcher, "u", &cache).is_err());

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 3);
        for path in seen {
            assert!(!path.exists(), "temp dir {} survived", path.display());
        }
    }

    #[test]
    fn test_git_fetcher_clones_local_repository() {
        let origin = TempDir::new().unwrap();
        let repo = git2::Repository::init(origin.path()).unwrap();
        write(&origin.path().join("skill").join("SKILL.md"), "# Modern Python");

        let mut index = repo.index().unwrap();
        index.add_path(Path::new("skill/SKILL.md")).unwrap();
        index.write().unwrap();
        let oid = index.write_tree().unwrap();
        let sig = git2::Signature::now("test", "test@example.com").unwrap();
        let tree = repo.find_tree(oid).unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial", &tree, &[]).unwrap();

        let home = TempDir::new().unwrap();
        let cache = SkillCache::new(home.path().join("skill"));
        let url = origin.path().to_str().unwrap();

        fetch_bundle(&GitFetcher, url, &cache).unwrap();
        assert_eq!(
            fs::read_to_string(cache.dir().join("SKILL.md")).unwrap(),
            "# Modern Python"
        );
    }

    #[test]
    fn test_git_fetcher_bad_url() {
        let home = TempDir::new().unwrap();
        let cache = SkillCache::new(home.path().join("skill"));
        let missing = home.path().join("no-such-repo");

        let err = fetch_bundle(&GitFetcher, missing.to_str().unwrap(), &cache).unwrap_err();
        assert!(matches!(err, Error::Remote(RemoteError::Clone { .. })));
        assert!(!cache.exists());
    }
}
