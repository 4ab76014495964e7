//! `listen`: stream native events to stdout as JSON lines.

use discord_rpc::{Error, Event, EventHandlers, Reply};

use super::Cli;
use super::config::Target;

/// Arguments for the `listen` subcommand.
#[derive(clap::Args)]
pub struct ListenArgs {
    /// Seconds to listen (0 = until interrupted).
    #[arg(short, long, default_value = "0")]
    pub secs: u64,

    /// Answer every join request with this reply (yes, no, ignore).
    #[arg(long, value_parser = super::parse_reply)]
    pub reply: Option<Reply>,
}

pub fn run(cli: &Cli, args: &ListenArgs) -> discord_rpc::Result<()> {
    let target = Target::resolve(cli)?;
    let (handlers, events) = EventHandlers::channel();
    let client = target.connect(handlers)?;
    super::pump(&client, &events, args.secs, |client, event| {
        println!("{}", to_json_line(&event)?);
        if let (Event::JoinRequest { user }, Some(reply)) = (&event, args.reply) {
            client.respond(&user.user_id, reply)?;
            tracing::info!(user = %user.username, ?reply, "answered join request");
        }
        Ok(())
    })?;
    client.shutdown();
    Ok(())
}

fn to_json_line(event: &Event) -> discord_rpc::Result<String> {
    serde_json::to_string(event).map_err(|e| Error::InvalidArgument(format!("encode event: {e}")))
}

#[cfg(test)]
mod tests {
    use discord_rpc::User;

    use super::*;

    #[test]
    fn events_are_tagged_json() {
        let line = to_json_line(&Event::JoinRequest {
            user: User {
                user_id: "53908232506183680".into(),
                username: "Mason".into(),
                discriminator: "0".into(),
                avatar: String::new(),
            },
        })
        .unwrap();
        assert!(line.starts_with(r#"{"event":"join_request","user":{"user_id":"53908232506183680""#));
        assert!(!line.contains('\n'));

        let line = to_json_line(&Event::Disconnected {
            code: 1000,
            message: "pipe closed".into(),
        })
        .unwrap();
        assert_eq!(line, r#"{"event":"disconnected","code":1000,"message":"pipe closed"}"#);
    }
}
