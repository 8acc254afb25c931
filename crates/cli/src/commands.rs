use anyhow::{Context, Result};
use mpskill_core::{
    Config, ConfigStore, PreconditionError, SkillHome, add_destination, resolve_path, sync_destination,
};
use mpskill_skills::{BundleLocator, BundleOrigin, GitFetcher, RepoFetcher, SkillCache, fetch_bundle};
use owo_colors::OwoColorize;
use std::path::Path;
use tracing::debug;

/// Everything a command needs from the outside world
pub struct CommandContext {
    home: SkillHome,
    locator: BundleLocator,
    fetcher: Box<dyn RepoFetcher>,
}

impl CommandContext {
    /// Context using the packaged bundle and git for `update`
    pub fn new(home: SkillHome) -> Self {
        Self { home, locator: BundleLocator::packaged(), fetcher: Box::new(GitFetcher) }
    }

    pub fn with_locator(mut self, locator: BundleLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_fetcher(mut self, fetcher: impl RepoFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    pub fn home(&self) -> &SkillHome {
        &self.home
    }

    fn store(&self) -> ConfigStore {
        ConfigStore::new(self.home.config_file())
    }

    fn cache(&self) -> SkillCache {
        SkillCache::for_home(&self.home)
    }
}

/// Create the home directory and default config, then fill the cache from the packaged bundle
pub fn cmd_init(ctx: &CommandContext) -> Result<()> {
    println!("{}", "Initializing modern-python-skill...".blue().bold());

    ctx.home.ensure().context("Failed to create config directory")?;

    let store = ctx.store();
    if store.exists() {
        println!(
            "{} Config already exists at {}",
            "Warning:".yellow().bold(),
            store.path().display()
        );
    } else {
        store.save(&Config::default()).context("Failed to create config")?;
        println!("{} Created config at {}", "Success:".green().bold(), store.path().display());
    }

    let cache = ctx.cache();
    let installed = ctx.locator.install(&cache).context("Error copying skills")?;
    debug!(source = %installed.source.display(), files = installed.summary.files, "skill cache populated");

    let suffix = match installed.origin {
        BundleOrigin::Packaged => "",
        BundleOrigin::Fallback => " (fallback)",
    };
    println!(
        "{} Copied skills to {}{}",
        "Success:".green().bold(),
        cache.dir().display(),
        suffix
    );

    Ok(())
}

/// Copy the cache into `<path>/modern-python-skill` and register the project
pub fn cmd_add(ctx: &CommandContext, name: &str, path: &Path) -> Result<()> {
    let target_root = resolve_path(path).context("Failed to resolve project path")?;
    let destination = add_destination(&target_root);

    let cache = ctx.cache();
    cache
        .install_into(&destination)
        .context("Error copying skills to target")?;
    println!("{} Copied skills to {}", "Success:".green().bold(), destination.display());

    let store = ctx.store();
    let mut config = store.load();
    config.register_project(name, &target_root);
    store.save(&config).context("Failed to save config")?;

    println!(
        "{} Added project '{}' with path {}",
        "Success:".green().bold(),
        name.cyan(),
        target_root.display()
    );
    Ok(())
}

/// Drop a project registration; files already copied stay where they are
pub fn cmd_remove(ctx: &CommandContext, name: &str) -> Result<()> {
    let store = ctx.store();
    let mut config = store.load();

    match config.unregister_project(name) {
        Some(root) => {
            store.save(&config).context("Failed to save config")?;
            debug!(project = name, root = %root.display(), "project unregistered");
            println!("{} Removed project '{}' from config.", "Success:".green().bold(), name.cyan());
        }
        None => {
            println!("{} Project '{}' not found in config.", "Warning:".yellow().bold(), name);
        }
    }
    Ok(())
}

/// Replace the cache with the bundle from a fresh clone of `mirror`
pub fn cmd_update(ctx: &CommandContext, mirror: &str) -> Result<()> {
    println!("{} Cloning {} to temporary directory...", "Info:".blue().bold(), mirror.cyan());

    let cache = ctx.cache();
    let summary = fetch_bundle(ctx.fetcher.as_ref(), mirror, &cache)?;
    debug!(files = summary.files, "skill cache refreshed");

    println!("{} Updated skills from {}.", "Success:".green().bold(), mirror);
    Ok(())
}

/// Copy the cache into a registered project's `skill/modern-python-skill`
pub fn cmd_sync(ctx: &CommandContext, name: &str) -> Result<()> {
    let config = ctx.store().load();
    let target_root = config
        .project(name)
        .ok_or_else(|| PreconditionError::ProjectNotFound(name.to_string()))?;
    let destination = sync_destination(target_root);

    let cache = ctx.cache();
    cache.install_into(&destination).context("Error syncing skills")?;

    println!("{} Synced skills to {}", "Success:".green().bold(), destination.display());
    Ok(())
}

/// Show the config location, cache state and registered projects
pub fn cmd_list(ctx: &CommandContext) -> Result<()> {
    let store = ctx.store();
    let config = store.load();
    let cache = ctx.cache();

    println!("{}", "modern-python-skill".green().bold().underline());
    println!();
    println!("  Config: {}", store.path().display());
    println!("  Source: {}", config.source_url.cyan());
    if cache.exists() {
        println!("  Skill cache: {}", cache.dir().display());
    } else {
        println!("  Skill cache: {} (run 'init')", "missing".yellow());
    }

    println!();
    if config.projects.is_empty() {
        println!("{} No projects registered", "Info:".blue().bold());
        return Ok(());
    }
    println!("{} Projects", "Info:".blue().bold());
    for (name, root) in &config.projects {
        println!("    - {} {}", name.cyan(), root.display());
    }
    Ok(())
}
