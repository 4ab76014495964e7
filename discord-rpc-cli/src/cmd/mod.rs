//! CLI argument definitions and subcommand routing.

pub mod config;
pub mod listen;
pub mod presence;
pub mod profile;

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use discord_rpc::{Client, Event, Reply};

/// Interval between callback pumps.
const POLL: Duration = Duration::from_millis(250);

/// Drive Discord rich presence through the native discord-rpc library.
#[derive(Parser)]
#[command(name = "discord-rpc", version, about)]
pub struct Cli {
    /// Profile holding the saved application settings.
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Discord application ID (overrides the profile).
    #[arg(short, long)]
    pub app_id: Option<String>,

    /// Path to the discord-rpc shared library (overrides the profile).
    #[arg(long = "lib")]
    pub library: Option<PathBuf>,

    /// Steam app ID to launch through (overrides the profile).
    #[arg(long)]
    pub steam_id: Option<String>,

    /// Do not let the native library register the launch protocol.
    #[arg(long)]
    pub no_auto_register: bool,

    /// Log filter, e.g. `debug` or `discord_rpc=trace` (default: `RUST_LOG`, then `info`).
    #[arg(long)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Publish a presence, then keep the session open.
    Set(presence::SetArgs),
    /// Clear the presence.
    Clear,
    /// Print native events as JSON lines.
    Listen(listen::ListenArgs),
    /// Register the URL protocol Discord uses to launch the application.
    Register {
        /// Launch command (default: the current executable).
        #[arg(long, conflicts_with = "steam")]
        command: Option<String>,
        /// Launch through Steam using the resolved Steam app ID.
        #[arg(long)]
        steam: bool,
    },
    /// Manage saved profiles.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

/// Profile subcommands.
#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the settings a command would use.
    Show,
    /// Save the global flags into the profile.
    Save,
    /// List all saved profiles.
    #[command(alias = "ls")]
    List,
    /// Remove a profile.
    #[command(alias = "rm")]
    Remove {
        /// Profile name to remove.
        name: String,
    },
    /// Show or set the default profile.
    Default {
        /// Profile name to set as default. Omit to show current.
        name: Option<String>,
    },
}

/// Dispatch a parsed command line.
pub fn run(cli: &Cli) -> discord_rpc::Result<()> {
    match &cli.command {
        Command::Set(args) => presence::set(cli, args),
        Command::Clear => presence::clear(cli),
        Command::Listen(args) => listen::run(cli, args),
        Command::Register { command, steam } => {
            let target = config::Target::resolve(cli)?;
            let native = target.open_library()?;
            if *steam {
                let steam_id = target.steam_id.as_deref().ok_or_else(|| {
                    discord_rpc::Error::InvalidArgument(
                        "no steam id: pass --steam-id or save one in the profile".into(),
                    )
                })?;
                discord_rpc::register_steam_game(&native, &target.app_id, steam_id)?;
            } else {
                discord_rpc::register(&native, &target.app_id, command.as_deref())?;
            }
            println!("Registered launch protocol for {}.", target.app_id);
            Ok(())
        }
        Command::Profile { action } => match action {
            ProfileAction::Show => profile::show(cli),
            ProfileAction::Save => profile::save(cli),
            ProfileAction::List => profile::list(),
            ProfileAction::Remove { name } => profile::remove(name),
            ProfileAction::Default { name } => profile::default(name.as_deref()),
        },
    }
}

/// Parse a join-request answer.
pub fn parse_reply(s: &str) -> Result<Reply, String> {
    match s.to_ascii_lowercase().as_str() {
        "yes" | "y" | "accept" => Ok(Reply::Yes),
        "no" | "n" | "deny" => Ok(Reply::No),
        "ignore" => Ok(Reply::Ignore),
        _ => Err(format!("unknown reply: {s} (expected: yes, no, ignore)")),
    }
}

/// Pump callbacks for `secs` seconds (`0` = until interrupted), handing each
/// event to `on_event`.
pub fn pump(
    client: &Client,
    events: &mpsc::Receiver<Event>,
    secs: u64,
    mut on_event: impl FnMut(&Client, Event) -> discord_rpc::Result<()>,
) -> discord_rpc::Result<()> {
    let deadline = (secs > 0).then(|| Instant::now() + Duration::from_secs(secs));
    loop {
        client.run_callbacks();
        for event in events.try_iter() {
            on_event(client, event)?;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(());
        }
        thread::sleep(POLL);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn reply_parsing() {
        assert_eq!(parse_reply("YES"), Ok(Reply::Yes));
        assert_eq!(parse_reply("deny"), Ok(Reply::No));
        assert_eq!(parse_reply("ignore"), Ok(Reply::Ignore));
        assert!(parse_reply("maybe").is_err());
    }

    #[test]
    fn global_flags_precede_the_subcommand() {
        let cli = Cli::try_parse_from([
            "discord-rpc",
            "--app-id",
            "345229890980937739",
            "--lib",
            "/opt/libdiscord-rpc.so",
            "set",
            "--state",
            "In menus",
        ])
        .unwrap();
        assert_eq!(cli.app_id.as_deref(), Some("345229890980937739"));
        assert!(matches!(cli.command, Command::Set(_)));
    }
}
