use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use mpskill_core::logging::{self, LoggingConfig};
use mpskill_core::{DEFAULT_SOURCE_URL, SkillHome};
use owo_colors::OwoColorize;
use std::path::PathBuf;

mod commands;

use commands::{CommandContext, cmd_add, cmd_init, cmd_list, cmd_remove, cmd_sync, cmd_update};

/// modern-python-skill - distribute the modern Python skill bundle to your projects
#[derive(Parser, Debug)]
#[command(name = "modern-python-skill")]
#[command(about = "CLI tool for managing modern python skills.", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding config.yaml and the skill cache (default: ~/.modern-python-skill)
    #[arg(long, value_name = "DIR", env = "MODERN_PYTHON_SKILL_HOME", global = true)]
    home: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the home directory, config.yaml and the local skill cache
    Init,
    /// Copy the cached skills into <PATH>/modern-python-skill and record the project
    Add {
        /// Project name used as the config key
        #[arg(value_name = "NAME")]
        name: String,

        /// Project root directory
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Remove a project from config.yaml (copied files are left in place)
    Remove {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Clone the skills repository and overwrite the local skill cache
    Update {
        /// Git mirror URL to pull from
        #[arg(long, value_name = "URL", default_value = DEFAULT_SOURCE_URL)]
        mirror: String,
    },
    /// Sync the local skill cache into a registered project
    Sync {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Show the config, skill cache and registered projects
    List,
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "modern-python-skill", &mut std::io::stdout());
        return Ok(());
    }

    let home = resolve_home(cli.home)?;

    let level = if cli.verbose { "debug" } else { "warn" };
    let _guard = logging::init_logging(
        LoggingConfig::new()
            .with_level(level)
            .with_file_logging_from_env(home.logs_dir()),
    )?;

    let ctx = CommandContext::new(home);
    if cli.verbose {
        println!("{} Using home: {}", "Info:".blue().bold(), ctx.home().root().display());
    }
    tracing::debug!(command = ?cli.command, home = %ctx.home().root().display(), "dispatching");

    match cli.command {
        Commands::Init => cmd_init(&ctx),
        Commands::Add { name, path } => cmd_add(&ctx, &name, &path),
        Commands::Remove { name } => cmd_remove(&ctx, &name),
        Commands::Update { mirror } => cmd_update(&ctx, &mirror),
        Commands::Sync { name } => cmd_sync(&ctx, &name),
        Commands::List => cmd_list(&ctx),
        Commands::Completions { .. } => Ok(()),
    }
}

/// Explicit `--home`/env value, otherwise `~/.modern-python-skill`
fn resolve_home(home: Option<PathBuf>) -> Result<SkillHome> {
    match home {
        Some(dir) => Ok(SkillHome::new(dir)),
        None => SkillHome::default_root()
            .map(SkillHome::new)
            .context("Failed to locate home directory"),
    }
}
