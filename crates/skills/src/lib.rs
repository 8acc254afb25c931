//! Skill bundle handling for modern-python-skill.
//!
//! The bundle lives in a single local cache (`~/.modern-python-skill/skill`), filled from the
//! packaged copy on `init` or from a fresh clone on `update`, and copied wholesale into projects.

mod cache;
mod copy;
mod locator;
mod remote;

pub use cache::SkillCache;
pub use copy::{CopySummary, replace_dir};
pub use locator::{BUNDLE_ENV, BundleLocator, BundleOrigin, InstalledBundle};
pub use remote::{BUNDLE_CANDIDATES, GitFetcher, RepoFetcher, fetch_bundle, find_bundle};
