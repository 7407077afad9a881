//! Config command
//!
//! Manage tubemod configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use tubemod_core::config::{Config, LOCAL_CONFIG_PATH};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Write to the per-user config directory instead of ./.tubemod
        #[arg(long)]
        global: bool,

        /// Overwrite without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,

    /// Show where configuration is looked up
    Path,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, explicit: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(explicit, json),
        ConfigCommand::Init { global, force } => init_config(explicit, global, force),
        ConfigCommand::Validate => validate_config(explicit),
        ConfigCommand::Path => show_paths(explicit),
    }
}

/// The file `discover` would read, if any
pub(crate) fn active_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Config::candidate_paths().into_iter().find(|p| p.exists()),
    }
}

fn show_config(explicit: Option<&Path>, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let mut config = Config::discover(explicit)?;
    // never echo the session secret
    if config.store.session_cookie.is_some() {
        config.store.session_cookie = Some("********".to_string());
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    match active_path(explicit) {
        Some(path) => println!("{}", path.display().to_string().dimmed()),
        None => println!("{}", "(defaults, no file found)".dimmed()),
    }
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}

fn init_config(explicit: Option<&Path>, global: bool, force: bool) -> Result<()> {
    use colored::Colorize;

    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None if global => Config::user_config_path(),
        None => PathBuf::from(LOCAL_CONFIG_PATH),
    };

    if path.exists() && !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("Overwrite {}?", path.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Init cancelled.");
            return Ok(());
        }
    }

    Config::default()
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Wrote {}", "✓".green(), path.display());
    println!(
        "Set '{}' or export {} to sign in.",
        "store.session_cookie".cyan(),
        "TUBEMOD_SESSION".cyan()
    );

    Ok(())
}

fn validate_config(explicit: Option<&Path>) -> Result<()> {
    use colored::Colorize;

    let Some(path) = active_path(explicit) else {
        println!(
            "{} No configuration file found, defaults are in use. Run '{}' to create one.",
            "⚠".yellow(),
            "tubemod config init".cyan()
        );
        return Ok(());
    };

    let config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}: {}", "✗".red(), path.display(), e);
            return Err(e.into());
        }
    };
    println!("{} {} parsed", "✓".green(), path.display());

    config.validate()?;
    println!("{} All values valid", "✓".green());

    if config.store.session_cookie.is_none() {
        println!(
            "{} store.session_cookie not set (TUBEMOD_SESSION can provide it)",
            "⚠".yellow()
        );
    }

    Ok(())
}

fn show_paths(explicit: Option<&Path>) -> Result<()> {
    use colored::Colorize;

    let paths = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => Config::candidate_paths(),
    };
    for path in paths {
        let mark = if path.exists() { "✓".green() } else { "-".dimmed() };
        println!("  {} {}", mark, path.display());
    }

    Ok(())
}
