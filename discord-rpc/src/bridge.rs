#![allow(unsafe_code)]
//! Natively-callable trampolines forwarding events to the installed handlers.
//!
//! The native library only ever receives the six fixed `extern "C"` functions
//! below. Each one reads the process-wide handler slot, which moves through
//! three transitions:
//!
//! - [`install`]: *uninstalled* → *installed*, at initialize.
//! - [`replace`]: swaps the table while *installed*.
//! - [`uninstall`]: back to *uninstalled*, at shutdown. Trampolines invoked
//!   afterwards do nothing.
//!
//! The slot lock is released before a handler runs, so a handler may call
//! [`replace`] (through [`Client::update_handlers`](crate::Client::update_handlers)).

use std::ffi::{c_char, c_int};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use discord_rpc_sys::{DiscordEventHandlers, DiscordUser};

use crate::error::{Error, Result};
use crate::ffi::read_borrowed;
use crate::handlers::{Event, EventHandlers};
use crate::types::User;

static HANDLERS: RwLock<Option<Arc<EventHandlers>>> = RwLock::new(None);
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Claim the process-wide slot and store `handlers` in it.
pub(crate) fn install(handlers: EventHandlers) -> Result<()> {
    if INSTALLED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(Error::AlreadyInitialized);
    }
    store(Some(Arc::new(handlers)));
    tracing::debug!("event handlers installed");
    Ok(())
}

/// Swap the handler table of the installed session.
pub(crate) fn replace(handlers: EventHandlers) {
    store(Some(Arc::new(handlers)));
    tracing::debug!("event handlers replaced");
}

/// Empty the slot and release the claim taken by [`install`].
pub(crate) fn uninstall() {
    store(None);
    INSTALLED.store(false, Ordering::Release);
    tracing::debug!("event handlers uninstalled");
}

/// Whether a session currently owns the handler slot.
#[must_use]
pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::Acquire)
}

/// The table handed to the native library. Always the same six addresses.
pub(crate) fn trampolines() -> DiscordEventHandlers {
    DiscordEventHandlers {
        ready: Some(on_ready),
        disconnected: Some(on_disconnected),
        errored: Some(on_errored),
        joinGame: Some(on_join_game),
        spectateGame: Some(on_spectate_game),
        joinRequest: Some(on_join_request),
    }
}

fn store(value: Option<Arc<EventHandlers>>) {
    *HANDLERS.write().unwrap_or_else(PoisonError::into_inner) = value;
}

fn current() -> Option<Arc<EventHandlers>> {
    HANDLERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Run `event` against the current table. Panics stop here.
fn forward(kind: &'static str, event: impl FnOnce() -> Event) {
    let Some(handlers) = current() else {
        tracing::trace!(event = kind, "no handlers installed, event dropped");
        return;
    };
    let event = event();
    if catch_unwind(AssertUnwindSafe(|| handlers.dispatch(&event))).is_err() {
        tracing::warn!(event = kind, "event handler panicked");
    }
}

unsafe fn read_user(user: *const DiscordUser) -> Option<User> {
    unsafe { user.as_ref().map(|raw| User::from_raw(raw)) }
}

unsafe extern "C" fn on_ready(user: *const DiscordUser) {
    let Some(user) = (unsafe { read_user(user) }) else {
        return;
    };
    forward("ready", || Event::Ready { user });
}

unsafe extern "C" fn on_disconnected(code: c_int, message: *const c_char) {
    forward("disconnected", || Event::Disconnected {
        code,
        message: unsafe { read_borrowed(message) }.into_owned(),
    });
}

unsafe extern "C" fn on_errored(code: c_int, message: *const c_char) {
    forward("errored", || Event::Errored {
        code,
        message: unsafe { read_borrowed(message) }.into_owned(),
    });
}

unsafe extern "C" fn on_join_game(secret: *const c_char) {
    forward("join_game", || Event::JoinGame {
        secret: unsafe { read_borrowed(secret) }.into_owned(),
    });
}

unsafe extern "C" fn on_spectate_game(secret: *const c_char) {
    forward("spectate_game", || Event::SpectateGame {
        secret: unsafe { read_borrowed(secret) }.into_owned(),
    });
}

unsafe extern "C" fn on_join_request(user: *const DiscordUser) {
    let Some(user) = (unsafe { read_user(user) }) else {
        return;
    };
    forward("join_request", || Event::JoinRequest { user });
}

/// Serializes unit tests that touch the process-wide slot.
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::ptr;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn raw_user() -> DiscordUser {
        DiscordUser {
            userId: c"u1".as_ptr(),
            username: c"Mason".as_ptr(),
            discriminator: c"1234".as_ptr(),
            avatar: ptr::null(),
        }
    }

    #[test]
    fn second_install_is_rejected() {
        let _g = test_lock();
        install(EventHandlers::new()).unwrap();
        assert!(is_installed());
        assert!(matches!(
            install(EventHandlers::new()),
            Err(Error::AlreadyInitialized)
        ));
        uninstall();
        assert!(!is_installed());
        install(EventHandlers::new()).unwrap();
        uninstall();
    }

    #[test]
    fn ready_reaches_handler_with_user() {
        let _g = test_lock();
        let seen = Arc::new(Mutex::new(Vec::new()));
        install(EventHandlers::new().on_ready({
            let seen = Arc::clone(&seen);
            move |u| seen.lock().unwrap().push(u.clone())
        }))
        .unwrap();
        let table = trampolines();
        let user = raw_user();
        unsafe { table.ready.unwrap()(&user) };
        uninstall();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].user_id, "u1");
        assert_eq!(seen[0].discriminator, "1234");
        assert!(seen[0].avatar.is_empty());
    }

    #[test]
    fn missing_handler_and_null_args_are_ignored() {
        let _g = test_lock();
        install(EventHandlers::new()).unwrap();
        let table = trampolines();
        unsafe {
            table.ready.unwrap()(ptr::null());
            table.joinRequest.unwrap()(ptr::null());
            table.errored.unwrap()(1, ptr::null());
            table.joinGame.unwrap()(c"secret".as_ptr());
        }
        uninstall();
    }

    #[test]
    fn events_after_uninstall_do_nothing() {
        let _g = test_lock();
        let hits = Arc::new(AtomicUsize::new(0));
        install(EventHandlers::new().on_join_game({
            let hits = Arc::clone(&hits);
            move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            }
        }))
        .unwrap();
        uninstall();
        unsafe { trampolines().joinGame.unwrap()(c"s".as_ptr()) };
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn handler_panic_does_not_escape() {
        let _g = test_lock();
        install(EventHandlers::new().on_errored(|_, _| panic!("boom"))).unwrap();
        unsafe { trampolines().errored.unwrap()(5, c"pipe".as_ptr()) };
        uninstall();
    }

    #[test]
    fn handler_may_replace_handlers() {
        let _g = test_lock();
        let hits = Arc::new(AtomicUsize::new(0));
        install(EventHandlers::new().on_spectate_game({
            let hits = Arc::clone(&hits);
            move |_| {
                let hits = Arc::clone(&hits);
                replace(EventHandlers::new().on_spectate_game(move |_| {
                    hits.fetch_add(10, Ordering::SeqCst);
                }));
            }
        }))
        .unwrap();
        let spectate = trampolines().spectateGame.unwrap();
        unsafe {
            spectate(c"a".as_ptr());
            spectate(c"b".as_ptr());
        }
        uninstall();
        assert_eq!(hits.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn table_addresses_are_stable() {
        let a = trampolines();
        let b = trampolines();
        assert_eq!(
            a.ready.map(|f| f as usize),
            b.ready.map(|f| f as usize)
        );
        assert_eq!(
            a.joinRequest.map(|f| f as usize),
            b.joinRequest.map(|f| f as usize)
        );
    }
}
