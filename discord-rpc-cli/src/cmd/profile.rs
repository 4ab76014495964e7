//! Profile management commands: show, save, list, remove, default.

use std::fs;

use super::Cli;
use super::config::{self, ProfileConfig};

/// Print the settings the selected profile and flags resolve to.
pub fn show(cli: &Cli) -> discord_rpc::Result<()> {
    let name = cli.profile.clone().unwrap_or_else(config::default_profile);
    let cfg = ProfileConfig::load_or_default(&name)?.merge(cli);
    let library = cfg.library.clone().unwrap_or_else(discord_rpc::native::default_path);
    println!("Profile:        {name}");
    println!(
        "Application ID: {}",
        cfg.app_id.as_deref().unwrap_or("(not set)")
    );
    println!("Library:        {}", library.display());
    println!(
        "Steam ID:       {}",
        cfg.steam_id.as_deref().unwrap_or("(not set)")
    );
    println!("Auto-register:  {}", cfg.auto_register);
    println!(
        "Config file:    {}",
        config::profile_dir(&name).join("profile.conf").display()
    );
    Ok(())
}

/// Save the flags into the selected profile, keeping fields not given.
pub fn save(cli: &Cli) -> discord_rpc::Result<()> {
    let name = cli.profile.clone().unwrap_or_else(config::default_profile);
    let cfg = ProfileConfig::load_or_default(&name)?.merge(cli);
    cfg.save(&name)?;
    if !config::config_dir().join(".default").exists() {
        config::set_default(&name)?;
    }
    println!("Profile '{name}' saved.");
    Ok(())
}

/// List all saved profiles.
pub fn list() -> discord_rpc::Result<()> {
    let base = config::config_dir();
    if !base.exists() {
        println!("No profiles found.");
        return Ok(());
    }

    let default = config::default_profile();

    let mut entries: Vec<_> = fs::read_dir(&base)?
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .collect();
    entries.sort_by_key(fs::DirEntry::file_name);

    if entries.is_empty() {
        println!("No profiles found.");
        return Ok(());
    }

    for entry in &entries {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let star = if *name == default { " *" } else { "" };

        if let Ok(cfg) = ProfileConfig::load(&name) {
            println!(
                "  {name:<16} {:<20} [{}]{star}",
                cfg.app_id.as_deref().unwrap_or("-"),
                if cfg.steam_id.is_some() { "steam" } else { "direct" },
            );
        } else {
            println!("  {name:<16} [no config]{star}");
        }
    }
    println!("\n  * = default");
    Ok(())
}

/// Remove a single profile directory.
pub fn remove(name: &str) -> discord_rpc::Result<()> {
    let dir = config::profile_dir(name);
    if !dir.exists() {
        println!("Profile '{name}' does not exist.");
        return Ok(());
    }
    fs::remove_dir_all(&dir)?;
    println!("Removed profile '{name}'.");
    Ok(())
}

/// Show or set the default profile.
pub fn default(name: Option<&str>) -> discord_rpc::Result<()> {
    match name {
        Some(name) => {
            if !config::profile_dir(name).exists() {
                return Err(discord_rpc::Error::InvalidArgument(format!(
                    "profile '{name}' does not exist"
                )));
            }
            config::set_default(name)?;
            println!("Default profile set to '{name}'.");
        }
        None => println!("{}", config::default_profile()),
    }
    Ok(())
}
