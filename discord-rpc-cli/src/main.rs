//! discord-rpc — set, clear and watch Discord rich presence from a terminal.
//!
//! Every subcommand loads the native library, opens one session, and pumps
//! callbacks on the main thread for as long as the command runs.

#![allow(
    missing_docs,
    missing_debug_implementations,
    clippy::print_stderr,
    clippy::print_stdout
)]

mod cmd;

use std::process;
use std::sync::OnceLock;

use clap::Parser;

use crate::cmd::Cli;

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Install the stderr tracing subscriber. Later calls are no-ops.
///
/// `level` is an `EnvFilter` directive; without one, `RUST_LOG` applies, then `info`.
fn init_logger(level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};
    LOGGER_INIT.get_or_init(|| {
        let filter = match level {
            Some(l) => EnvFilter::builder().parse_lossy(l),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::builder().parse_lossy("info")),
        };
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .try_init();
    });
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log.as_deref());
    if let Err(e) = cmd::run(&cli) {
        eprintln!("fatal: {e}");
        process::exit(1);
    }
}
