//! Raw FFI bindings to `discord-rpc` — the Discord rich presence shared library.
//!
//! All types and functions are **auto-generated** by [`bindgen`](https://docs.rs/bindgen)
//! from the C headers `discord_rpc.h` and `discord_register.h`. Do not edit manually.
//!
//! The library is loaded at runtime through [`libloading`]: [`DiscordRpc`] owns the
//! loaded library and one resolved function pointer per exported entry point.
//! Nothing is linked at build time.
//!
//! # Build
//!
//! The build script (`build.rs`) optionally:
//! 1. Downloads the pre-built shared library from the upstream GitHub release
//!    (feature `download`) and exposes its directory as [`BUNDLED_DIR`].
//! 2. Runs `bindgen` on the included headers (feature `regenerate`).
//!
//! For local development, set `DISCORD_RPC_DIR` to a directory containing a
//! built `discord-rpc` shared library; it takes precedence over downloading.

// sys crate: unsafe FFI, non-idiomatic generated code
#![allow(
    unsafe_code,
    unsafe_op_in_unsafe_fn,
    missing_docs,
    missing_debug_implementations,
    non_camel_case_types,
    non_upper_case_globals,
    non_snake_case,
    clippy::missing_safety_doc,
    clippy::upper_case_acronyms
)]

// When the `regenerate` feature is enabled, use freshly generated bindings.
// Otherwise, use the pre-generated bindings committed in the repository.
#[cfg(feature = "regenerate")]
include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
#[cfg(not(feature = "regenerate"))]
include!("bindings.rs");

/// Directory holding the shared library fetched at build time, if any.
pub const BUNDLED_DIR: Option<&str> = option_env!("DISCORD_RPC_BUNDLED_DIR");

/// Base name of the shared library (`discord-rpc.dll`, `libdiscord-rpc.so`, ...).
pub const LIBRARY_NAME: &str = "discord-rpc";

#[cfg(all(test, target_pointer_width = "64"))]
mod layout {
    use std::mem::{align_of, offset_of, size_of};

    use super::*;

    #[test]
    fn rich_presence_matches_c_layout() {
        assert_eq!(size_of::<DiscordRichPresence>(), 120);
        assert_eq!(align_of::<DiscordRichPresence>(), 8);
        assert_eq!(offset_of!(DiscordRichPresence, startTimestamp), 16);
        assert_eq!(offset_of!(DiscordRichPresence, endTimestamp), 24);
        assert_eq!(offset_of!(DiscordRichPresence, partyId), 64);
        assert_eq!(offset_of!(DiscordRichPresence, partySize), 72);
        assert_eq!(offset_of!(DiscordRichPresence, partyMax), 76);
        assert_eq!(offset_of!(DiscordRichPresence, partyPrivacy), 80);
        assert_eq!(offset_of!(DiscordRichPresence, matchSecret), 88);
        assert_eq!(offset_of!(DiscordRichPresence, spectateSecret), 104);
        assert_eq!(offset_of!(DiscordRichPresence, instance), 112);
    }

    #[test]
    fn user_and_handlers_match_c_layout() {
        assert_eq!(size_of::<DiscordUser>(), 32);
        assert_eq!(offset_of!(DiscordUser, avatar), 24);
        assert_eq!(size_of::<DiscordEventHandlers>(), 48);
        assert_eq!(offset_of!(DiscordEventHandlers, joinRequest), 40);
    }

    #[test]
    fn default_record_is_zeroed() {
        let p = DiscordRichPresence::default();
        assert!(p.state.is_null());
        assert!(p.spectateSecret.is_null());
        assert_eq!(p.startTimestamp, 0);
        assert_eq!(p.instance, 0);
        let h = DiscordEventHandlers::default();
        assert!(h.ready.is_none() && h.joinRequest.is_none());
    }
}
