#![allow(unsafe_code)]
//! The native counterpart: a trait over the library's C entry points and the
//! dynamically loaded implementation of it.

use std::ffi::{OsString, c_char, c_int};
use std::fmt;
use std::path::{Path, PathBuf};

use discord_rpc_sys::{DiscordEventHandlers, DiscordRichPresence, DiscordRpc};

use crate::error::Result;

/// Environment variable naming the shared library to load.
pub const LIBRARY_ENV: &str = "DISCORD_RPC_LIB";

/// The C entry points of discord-rpc, one method each.
///
/// [`Library`] forwards to the real shared library; tests provide their own
/// implementation to observe what crosses the boundary.
///
/// # Safety
///
/// Implementations receive raw pointers exactly as the C ABI would. Callers
/// guarantee that every pointer is null or valid for the duration of the call,
/// and string pointers are NUL-terminated.
pub trait Native {
    /// `Discord_Initialize`.
    unsafe fn initialize(
        &self,
        application_id: *const c_char,
        handlers: *mut DiscordEventHandlers,
        auto_register: c_int,
        optional_steam_id: *const c_char,
    );
    /// `Discord_Shutdown`.
    unsafe fn shutdown(&self);
    /// `Discord_RunCallbacks`.
    unsafe fn run_callbacks(&self);
    /// `Discord_UpdatePresence`.
    unsafe fn update_presence(&self, presence: *const DiscordRichPresence);
    /// `Discord_ClearPresence`.
    unsafe fn clear_presence(&self);
    /// `Discord_Respond`.
    unsafe fn respond(&self, user_id: *const c_char, reply: c_int);
    /// `Discord_UpdateHandlers`.
    unsafe fn update_handlers(&self, handlers: *mut DiscordEventHandlers);
    /// `Discord_Register`.
    unsafe fn register(&self, application_id: *const c_char, command: *const c_char);
    /// `Discord_RegisterSteamGame`.
    unsafe fn register_steam_game(&self, application_id: *const c_char, steam_id: *const c_char);
}

/// The discord-rpc shared library, loaded at runtime.
pub struct Library {
    rpc: DiscordRpc,
    path: PathBuf,
}

impl Library {
    /// Load the library from the default location.
    ///
    /// Looks in order at `$DISCORD_RPC_LIB`, the directory bundled at build
    /// time (crate feature `download`), then the platform library name on the
    /// system search path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Library`](crate::Error::Library) if the library cannot
    /// be opened or lacks an entry point.
    pub fn load() -> Result<Self> {
        Self::open(default_path())
    }

    /// Load the library from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Library`](crate::Error::Library) if the library cannot
    /// be opened or lacks an entry point.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        tracing::debug!(path = %path.display(), "loading discord-rpc");
        // Runs the library's static initializers.
        let rpc = unsafe { DiscordRpc::new(&path) }?;
        Ok(Self { rpc, path })
    }

    /// Where the library was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library").field("path", &self.path).finish()
    }
}

/// Resolve the library path used by [`Library::load`].
#[must_use]
pub fn default_path() -> PathBuf {
    resolve(
        std::env::var_os(LIBRARY_ENV),
        discord_rpc_sys::BUNDLED_DIR.map(Path::new),
    )
}

fn resolve(env: Option<OsString>, bundled: Option<&Path>) -> PathBuf {
    let file = libloading::library_filename(discord_rpc_sys::LIBRARY_NAME);
    if let Some(p) = env.filter(|p| !p.is_empty()) {
        return PathBuf::from(p);
    }
    if let Some(dir) = bundled {
        let candidate = dir.join(&file);
        if candidate.is_file() {
            return candidate;
        }
    }
    PathBuf::from(file)
}

impl Native for Library {
    unsafe fn initialize(
        &self,
        application_id: *const c_char,
        handlers: *mut DiscordEventHandlers,
        auto_register: c_int,
        optional_steam_id: *const c_char,
    ) {
        unsafe {
            self.rpc
                .Discord_Initialize(application_id, handlers, auto_register, optional_steam_id);
        }
    }

    unsafe fn shutdown(&self) {
        unsafe { self.rpc.Discord_Shutdown() }
    }

    unsafe fn run_callbacks(&self) {
        unsafe { self.rpc.Discord_RunCallbacks() }
    }

    unsafe fn update_presence(&self, presence: *const DiscordRichPresence) {
        unsafe { self.rpc.Discord_UpdatePresence(presence) }
    }

    unsafe fn clear_presence(&self) {
        unsafe { self.rpc.Discord_ClearPresence() }
    }

    unsafe fn respond(&self, user_id: *const c_char, reply: c_int) {
        unsafe { self.rpc.Discord_Respond(user_id, reply) }
    }

    unsafe fn update_handlers(&self, handlers: *mut DiscordEventHandlers) {
        unsafe { self.rpc.Discord_UpdateHandlers(handlers) }
    }

    unsafe fn register(&self, application_id: *const c_char, command: *const c_char) {
        unsafe { self.rpc.Discord_Register(application_id, command) }
    }

    unsafe fn register_steam_game(&self, application_id: *const c_char, steam_id: *const c_char) {
        unsafe { self.rpc.Discord_RegisterSteamGame(application_id, steam_id) }
    }
}
