#![allow(unsafe_code)]
//! The native call adapter: a live discord-rpc session.

use std::fmt;
use std::marker::PhantomData;

use crate::bridge;
use crate::buffer::BufferStats;
use crate::error::Result;
use crate::ffi::{c_str_ptr, optional_c_string, to_c_string};
use crate::handlers::EventHandlers;
use crate::native::{Library, Native};
use crate::presence::Presence;
use crate::record::RecordBuilder;
use crate::types::Reply;

/// Register a URL protocol so Discord can launch the application.
///
/// `command` is the launch command line; `None` lets the native library use
/// the current executable.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if an
/// argument contains a NUL byte.
pub fn register(native: &dyn Native, application_id: &str, command: Option<&str>) -> Result<()> {
    let app = to_c_string(application_id)?;
    let cmd = optional_c_string(command)?;
    unsafe { native.register(app.as_ptr(), c_str_ptr(cmd.as_ref())) };
    tracing::debug!(application_id, "registered launch command");
    Ok(())
}

/// Register a URL protocol that launches the application through Steam.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if an
/// argument contains a NUL byte.
pub fn register_steam_game(native: &dyn Native, application_id: &str, steam_id: &str) -> Result<()> {
    let app = to_c_string(application_id)?;
    let steam = to_c_string(steam_id)?;
    unsafe { native.register_steam_game(app.as_ptr(), steam.as_ptr()) };
    tracing::debug!(application_id, steam_id, "registered steam launch");
    Ok(())
}

/// A connected discord-rpc session.
///
/// Only one client can exist per process: the native library keeps a single
/// global connection. The client is neither `Send` nor `Sync`; every call,
/// including the callbacks fired from [`run_callbacks`](Self::run_callbacks),
/// happens on the thread that created it.
///
/// Dropping the client shuts the session down.
pub struct Client {
    native: Box<dyn Native>,
    records: RecordBuilder,
    clear_on_shutdown: bool,
    closed: bool,
    _thread: PhantomData<*const ()>,
}

impl Client {
    /// Start configuring a session for `application_id`.
    #[must_use]
    pub fn builder(application_id: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            application_id: application_id.into(),
            handlers: EventHandlers::new(),
            auto_register: true,
            steam_id: None,
            clear_on_shutdown: false,
        }
    }

    /// Publish `presence`, replacing whatever is shown.
    ///
    /// The string buffers built for the call are released before this
    /// returns, on every path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if a
    /// field contains a NUL byte; nothing reaches the native library then.
    pub fn update_presence(&mut self, presence: &Presence) -> Result<()> {
        let native = &*self.native;
        self.records
            .scoped(presence, |raw| unsafe { native.update_presence(raw) })
    }

    /// Remove the presence from the user's profile.
    pub fn clear_presence(&self) {
        unsafe { self.native.clear_presence() };
    }

    /// Answer a join request from `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// `user_id` contains a NUL byte.
    pub fn respond(&self, user_id: &str, reply: Reply) -> Result<()> {
        let c = to_c_string(user_id)?;
        unsafe { self.native.respond(c.as_ptr(), reply.to_ffi()) };
        Ok(())
    }

    /// Pump pending events, invoking handlers on this thread.
    pub fn run_callbacks(&self) {
        unsafe { self.native.run_callbacks() };
    }

    /// Replace the event handlers of this session.
    pub fn update_handlers(&self, handlers: EventHandlers) {
        bridge::replace(handlers);
        let mut table = bridge::trampolines();
        unsafe { self.native.update_handlers(&raw mut table) };
    }

    /// Lifetime counters of the presence string buffers.
    #[must_use]
    pub const fn buffer_stats(&self) -> BufferStats {
        self.records.buffers().stats()
    }

    /// End the session. Handlers stop firing once this returns.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if self.clear_on_shutdown {
            unsafe { self.native.clear_presence() };
        }
        unsafe { self.native.shutdown() };
        bridge::uninstall();
        self.records.release();
        tracing::debug!("discord-rpc shut down");
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("records", &self.records)
            .field("clear_on_shutdown", &self.clear_on_shutdown)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    application_id: String,
    handlers: EventHandlers,
    auto_register: bool,
    steam_id: Option<String>,
    clear_on_shutdown: bool,
}

impl ClientBuilder {
    /// Set the event handlers (default: none).
    #[must_use]
    pub fn handlers(mut self, handlers: EventHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// Let the native library register the launch protocol (default: `true`).
    #[must_use]
    pub const fn auto_register(mut self, yes: bool) -> Self {
        self.auto_register = yes;
        self
    }

    /// Launch through Steam with this app ID when auto-registering.
    #[must_use]
    pub fn steam_id(mut self, id: impl Into<String>) -> Self {
        self.steam_id = Some(id.into());
        self
    }

    /// Clear the presence before shutting down (default: `false`).
    #[must_use]
    pub const fn clear_on_shutdown(mut self, yes: bool) -> Self {
        self.clear_on_shutdown = yes;
        self
    }

    /// Load the shared library from its default location and initialize.
    ///
    /// # Errors
    ///
    /// See [`Library::load`] and [`initialize`](Self::initialize).
    pub fn connect(self) -> Result<Client> {
        let library = Library::load()?;
        self.initialize(library)
    }

    /// Initialize a session over `native`.
    ///
    /// The handlers are installed process-wide and the native library receives
    /// the fixed trampoline table in their place.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the
    ///   application or Steam ID contains a NUL byte.
    /// - [`Error::AlreadyInitialized`](crate::Error::AlreadyInitialized) if
    ///   another client is live in this process.
    pub fn initialize(self, native: impl Native + 'static) -> Result<Client> {
        let app = to_c_string(&self.application_id)?;
        let steam = optional_c_string(self.steam_id.as_deref())?;
        bridge::install(self.handlers)?;
        let mut claim = InstallGuard { armed: true };
        let mut table = bridge::trampolines();
        unsafe {
            native.initialize(
                app.as_ptr(),
                &raw mut table,
                i32::from(self.auto_register),
                c_str_ptr(steam.as_ref()),
            );
        }
        tracing::debug!(
            application_id = %self.application_id,
            auto_register = self.auto_register,
            "discord-rpc initialized"
        );
        claim.armed = false;
        Ok(Client {
            native: Box::new(native),
            records: RecordBuilder::new(),
            clear_on_shutdown: self.clear_on_shutdown,
            closed: false,
            _thread: PhantomData,
        })
    }
}

/// Gives the handler slot back if native initialize unwinds.
struct InstallGuard {
    armed: bool,
}

impl Drop for InstallGuard {
    fn drop(&mut self) {
        if self.armed {
            bridge::uninstall();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::ffi::{CStr, c_char, c_int};
    use std::rc::Rc;

    use discord_rpc_sys::{DiscordEventHandlers, DiscordRichPresence};

    use super::*;
    use crate::Error;
    use crate::bridge::test_lock;

    #[derive(Default)]
    struct Log(Rc<RefCell<Vec<String>>>);

    unsafe fn text(p: *const c_char) -> String {
        if p.is_null() {
            "<null>".into()
        } else {
            unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned()
        }
    }

    impl Native for Log {
        unsafe fn initialize(
            &self,
            app: *const c_char,
            _: *mut DiscordEventHandlers,
            auto: c_int,
            steam: *const c_char,
        ) {
            let line = unsafe { format!("init {} {auto} {}", text(app), text(steam)) };
            self.0.borrow_mut().push(line);
        }
        unsafe fn shutdown(&self) {
            self.0.borrow_mut().push("shutdown".into());
        }
        unsafe fn run_callbacks(&self) {}
        unsafe fn update_presence(&self, p: *const DiscordRichPresence) {
            let state = unsafe { text((*p).state) };
            self.0.borrow_mut().push(format!("update {state}"));
        }
        unsafe fn clear_presence(&self) {
            self.0.borrow_mut().push("clear".into());
        }
        unsafe fn respond(&self, user: *const c_char, reply: c_int) {
            let line = unsafe { format!("respond {} {reply}", text(user)) };
            self.0.borrow_mut().push(line);
        }
        unsafe fn update_handlers(&self, _: *mut DiscordEventHandlers) {
            self.0.borrow_mut().push("handlers".into());
        }
        unsafe fn register(&self, app: *const c_char, cmd: *const c_char) {
            let line = unsafe { format!("register {} {}", text(app), text(cmd)) };
            self.0.borrow_mut().push(line);
        }
        unsafe fn register_steam_game(&self, app: *const c_char, steam: *const c_char) {
            let line = unsafe { format!("steam {} {}", text(app), text(steam)) };
            self.0.borrow_mut().push(line);
        }
    }

    #[test]
    fn session_lifecycle_reaches_native() {
        let _g = test_lock();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut client = Client::builder("345229890980937739")
            .auto_register(false)
            .steam_id("480")
            .clear_on_shutdown(true)
            .initialize(Log(Rc::clone(&log)))
            .unwrap();
        client
            .update_presence(&Presence::new().state("In menus"))
            .unwrap();
        client.respond("user123", Reply::Yes).unwrap();
        client.update_handlers(EventHandlers::new());
        assert_eq!(client.buffer_stats().live(), 0);
        client.shutdown();
        assert_eq!(
            *log.borrow(),
            [
                "init 345229890980937739 0 480",
                "update In menus",
                "respond user123 1",
                "handlers",
                "clear",
                "shutdown",
            ]
        );
        assert!(!bridge::is_installed());
    }

    #[test]
    fn drop_shuts_down_once() {
        let _g = test_lock();
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let _client = Client::builder("1")
                .initialize(Log(Rc::clone(&log)))
                .unwrap();
        }
        assert_eq!(*log.borrow(), ["init 1 1 <null>", "shutdown"]);
        assert!(!bridge::is_installed());
    }

    #[test]
    fn bad_application_id_installs_nothing() {
        let _g = test_lock();
        let err = Client::builder("12\03")
            .initialize(Log::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(!bridge::is_installed());
    }

    #[test]
    fn registration_wrappers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let native = Log(Rc::clone(&log));
        register(&native, "42", None).unwrap();
        register(&native, "42", Some("game.exe --rpc")).unwrap();
        register_steam_game(&native, "42", "480").unwrap();
        assert!(register_steam_game(&native, "4\02", "480").is_err());
        assert_eq!(
            *log.borrow(),
            ["register 42 <null>", "register 42 game.exe --rpc", "steam 42 480"]
        );
    }
}
