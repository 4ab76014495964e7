#![doc = include_str!("../README.md")]

pub mod buffer;
pub mod client;
pub mod error;
pub mod handlers;
pub mod native;
pub mod presence;
pub mod record;
pub mod types;

mod bridge;
mod ffi;

// Re-export core public API at crate root.
pub use buffer::{BufferSet, BufferStats};
pub use client::{Client, ClientBuilder};
pub use error::{Error, Result};
pub use handlers::{Event, EventHandlers};
pub use native::{Library, Native};
pub use presence::{MAX_IMAGE_KEY_BYTES, MAX_TEXT_BYTES, Presence};
pub use record::{NativeRecord, RecordBuilder};
pub use types::{PartyPrivacy, Reply, User};

// Re-export standalone functions.
pub use bridge::is_installed;
pub use client::{register, register_steam_game};
