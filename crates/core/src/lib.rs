pub mod config;
pub mod error;
pub mod layout;
pub mod logging;

pub use config::{Config, ConfigError, ConfigStore};
pub use error::{Error, PreconditionError, RemoteError, Result};
pub use layout::{
    BUNDLE_DIR_NAME, DEFAULT_SOURCE_URL, SkillHome, add_destination, resolve_path, sync_destination,
};
