//! `set` and `clear`.

use std::fs;
use std::path::PathBuf;

use discord_rpc::{Error, Event, EventHandlers, PartyPrivacy, Presence};

use super::Cli;
use super::config::Target;

/// Arguments for the `set` subcommand.
///
/// A presence file is read first; flags then override its fields.
#[derive(clap::Args)]
pub struct SetArgs {
    /// JSON presence document to start from.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// State line.
    #[arg(long)]
    pub state: Option<String>,

    /// Details line.
    #[arg(long)]
    pub details: Option<String>,

    /// Start timestamp (epoch seconds).
    #[arg(long, conflicts_with = "elapsed")]
    pub start: Option<i64>,

    /// Show time elapsed since now.
    #[arg(long)]
    pub elapsed: bool,

    /// End timestamp (epoch seconds).
    #[arg(long)]
    pub end: Option<i64>,

    /// Large image asset key.
    #[arg(long)]
    pub large_image: Option<String>,

    /// Large image tooltip.
    #[arg(long)]
    pub large_text: Option<String>,

    /// Small image asset key.
    #[arg(long)]
    pub small_image: Option<String>,

    /// Small image tooltip.
    #[arg(long)]
    pub small_text: Option<String>,

    /// Party identifier.
    #[arg(long)]
    pub party_id: Option<String>,

    /// Current party size.
    #[arg(long)]
    pub party_size: Option<u32>,

    /// Maximum party size.
    #[arg(long)]
    pub party_max: Option<u32>,

    /// Let anyone join the party.
    #[arg(long)]
    pub public: bool,

    /// Match secret.
    #[arg(long)]
    pub match_secret: Option<String>,

    /// Join secret.
    #[arg(long)]
    pub join_secret: Option<String>,

    /// Spectate secret.
    #[arg(long)]
    pub spectate_secret: Option<String>,

    /// Mark the session as an in-game instance.
    #[arg(long)]
    pub instance: bool,

    /// Reject fields over the native size limits instead of letting Discord clip them.
    #[arg(long)]
    pub strict: bool,

    /// Seconds to keep the session open (0 = until interrupted).
    #[arg(short, long, default_value = "30")]
    pub watch: u64,
}

impl SetArgs {
    /// Build the presence described by the file and flags.
    pub fn presence(&self) -> discord_rpc::Result<Presence> {
        let mut p = match &self.file {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                serde_json::from_str(&text).map_err(|e| {
                    Error::InvalidArgument(format!("{}: {e}", path.display()))
                })?
            }
            None => Presence::new(),
        };
        overlay(&mut p.state, self.state.as_deref());
        overlay(&mut p.details, self.details.as_deref());
        overlay(&mut p.large_image_key, self.large_image.as_deref());
        overlay(&mut p.large_image_text, self.large_text.as_deref());
        overlay(&mut p.small_image_key, self.small_image.as_deref());
        overlay(&mut p.small_image_text, self.small_text.as_deref());
        overlay(&mut p.party_id, self.party_id.as_deref());
        overlay(&mut p.match_secret, self.match_secret.as_deref());
        overlay(&mut p.join_secret, self.join_secret.as_deref());
        overlay(&mut p.spectate_secret, self.spectate_secret.as_deref());
        if let Some(ts) = self.start {
            p.start_timestamp = ts;
        }
        if self.elapsed {
            p = p.with_start_now();
        }
        if let Some(ts) = self.end {
            p.end_timestamp = ts;
        }
        if let Some(n) = self.party_size {
            p.party_size = n;
        }
        if let Some(n) = self.party_max {
            p.party_max = n;
        }
        if self.public {
            p.party_privacy = PartyPrivacy::Public;
        }
        if self.instance {
            p.instance = true;
        }
        if self.strict {
            p.validate()?;
        }
        Ok(p)
    }
}

fn overlay(field: &mut Option<String>, flag: Option<&str>) {
    if let Some(v) = flag {
        *field = Some(v.to_owned());
    }
}

/// Publish a presence and keep the session open for `--watch` seconds.
pub fn set(cli: &Cli, args: &SetArgs) -> discord_rpc::Result<()> {
    let presence = args.presence()?;
    let target = Target::resolve(cli)?;
    let (handlers, events) = EventHandlers::channel();
    let mut client = target.connect(handlers)?;
    client.update_presence(&presence)?;
    eprintln!("Presence set. Ctrl-C to stop.");
    super::pump(&client, &events, args.watch, |_, event| {
        log_event(&event);
        Ok(())
    })?;
    client.shutdown();
    Ok(())
}

/// Clear the presence and shut down.
pub fn clear(cli: &Cli) -> discord_rpc::Result<()> {
    let target = Target::resolve(cli)?;
    let client = target.connect(EventHandlers::new())?;
    client.clear_presence();
    client.run_callbacks();
    client.shutdown();
    println!("Presence cleared.");
    Ok(())
}

fn log_event(event: &Event) {
    match event {
        Event::Ready { user } => tracing::info!(user = %user.username, id = %user.user_id, "ready"),
        Event::Disconnected { code, message } => tracing::warn!(code, %message, "disconnected"),
        Event::Errored { code, message } => tracing::error!(code, %message, "errored"),
        other => tracing::info!(?other, "event"),
    }
}
