//! Application callbacks for native events.
//!
//! An [`EventHandlers`] table holds at most one callback per event kind.
//! Callbacks run synchronously on the thread that calls
//! [`Client::run_callbacks`](crate::Client::run_callbacks).

use std::fmt;
use std::sync::mpsc;

use crate::types::User;

type UserFn = Box<dyn Fn(&User) + Send + Sync>;
type StatusFn = Box<dyn Fn(i32, &str) + Send + Sync>;
type SecretFn = Box<dyn Fn(&str) + Send + Sync>;

/// A native event, in owned form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum Event {
    /// Connected to the Discord client.
    Ready {
        /// The logged-in user.
        user: User,
    },
    /// The connection was lost.
    Disconnected {
        /// Native error code.
        code: i32,
        /// Human-readable reason.
        message: String,
    },
    /// The native library reported an error.
    Errored {
        /// Native error code.
        code: i32,
        /// Human-readable reason.
        message: String,
    },
    /// The user accepted an invite; join with this secret.
    JoinGame {
        /// The join secret from the inviting presence.
        secret: String,
    },
    /// The user chose to spectate; watch with this secret.
    SpectateGame {
        /// The spectate secret from the target presence.
        secret: String,
    },
    /// Another user asked to join; answer with [`Client::respond`](crate::Client::respond).
    JoinRequest {
        /// The requesting user.
        user: User,
    },
}

/// The set of application callbacks, one optional entry per event kind.
#[derive(Default)]
pub struct EventHandlers {
    pub(crate) ready: Option<UserFn>,
    pub(crate) disconnected: Option<StatusFn>,
    pub(crate) errored: Option<StatusFn>,
    pub(crate) join_game: Option<SecretFn>,
    pub(crate) spectate_game: Option<SecretFn>,
    pub(crate) join_request: Option<UserFn>,
}

impl EventHandlers {
    /// An empty table: every event is ignored.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handlers that forward every event into a channel.
    ///
    /// Drain the receiver after each [`Client::run_callbacks`](crate::Client::run_callbacks).
    #[must_use]
    pub fn channel() -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        let handlers = Self::new()
            .on_ready({
                let tx = tx.clone();
                move |user| {
                    let _ = tx.send(Event::Ready { user: user.clone() });
                }
            })
            .on_disconnected({
                let tx = tx.clone();
                move |code, message| {
                    let _ = tx.send(Event::Disconnected {
                        code,
                        message: message.to_owned(),
                    });
                }
            })
            .on_errored({
                let tx = tx.clone();
                move |code, message| {
                    let _ = tx.send(Event::Errored {
                        code,
                        message: message.to_owned(),
                    });
                }
            })
            .on_join_game({
                let tx = tx.clone();
                move |secret| {
                    let _ = tx.send(Event::JoinGame {
                        secret: secret.to_owned(),
                    });
                }
            })
            .on_spectate_game({
                let tx = tx.clone();
                move |secret| {
                    let _ = tx.send(Event::SpectateGame {
                        secret: secret.to_owned(),
                    });
                }
            })
            .on_join_request(move |user| {
                let _ = tx.send(Event::JoinRequest { user: user.clone() });
            });
        (handlers, rx)
    }

    /// Called once the connection to Discord is established.
    #[must_use]
    pub fn on_ready(mut self, f: impl Fn(&User) + Send + Sync + 'static) -> Self {
        self.ready = Some(Box::new(f));
        self
    }

    /// Called when the connection drops, with an error code and reason.
    #[must_use]
    pub fn on_disconnected(mut self, f: impl Fn(i32, &str) + Send + Sync + 'static) -> Self {
        self.disconnected = Some(Box::new(f));
        self
    }

    /// Called when the native library reports an error.
    #[must_use]
    pub fn on_errored(mut self, f: impl Fn(i32, &str) + Send + Sync + 'static) -> Self {
        self.errored = Some(Box::new(f));
        self
    }

    /// Called with the join secret when the user joins through Discord.
    #[must_use]
    pub fn on_join_game(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.join_game = Some(Box::new(f));
        self
    }

    /// Called with the spectate secret when the user spectates through Discord.
    #[must_use]
    pub fn on_spectate_game(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.spectate_game = Some(Box::new(f));
        self
    }

    /// Called when another user asks to join.
    #[must_use]
    pub fn on_join_request(mut self, f: impl Fn(&User) + Send + Sync + 'static) -> Self {
        self.join_request = Some(Box::new(f));
        self
    }

    /// Invoke the handler matching `event`, if one is set.
    pub fn dispatch(&self, event: &Event) {
        match event {
            Event::Ready { user } => call(self.ready.as_deref(), |f| f(user)),
            Event::Disconnected { code, message } => {
                call(self.disconnected.as_deref(), |f| f(*code, message));
            }
            Event::Errored { code, message } => {
                call(self.errored.as_deref(), |f| f(*code, message));
            }
            Event::JoinGame { secret } => call(self.join_game.as_deref(), |f| f(secret)),
            Event::SpectateGame { secret } => call(self.spectate_game.as_deref(), |f| f(secret)),
            Event::JoinRequest { user } => call(self.join_request.as_deref(), |f| f(user)),
        }
    }
}

fn call<F: ?Sized>(handler: Option<&F>, invoke: impl FnOnce(&F)) {
    if let Some(f) = handler {
        invoke(f);
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("ready", &self.ready.is_some())
            .field("disconnected", &self.disconnected.is_some())
            .field("errored", &self.errored.is_some())
            .field("join_game", &self.join_game.is_some())
            .field("spectate_game", &self.spectate_game.is_some())
            .field("join_request", &self.join_request.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn user(id: &str) -> User {
        User {
            user_id: id.into(),
            username: "n".into(),
            ..User::default()
        }
    }

    #[test]
    fn unset_handlers_are_ignored() {
        let h = EventHandlers::new();
        h.dispatch(&Event::Ready { user: user("u1") });
        h.dispatch(&Event::JoinGame {
            secret: "s".into(),
        });
    }

    #[test]
    fn dispatch_routes_by_kind() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = EventHandlers::new().on_errored({
            let hits = Arc::clone(&hits);
            move |code, msg| {
                assert_eq!((code, msg), (4000, "invalid client id"));
                hits.fetch_add(1, Ordering::SeqCst);
            }
        });
        h.dispatch(&Event::Disconnected {
            code: 1,
            message: "pipe closed".into(),
        });
        h.dispatch(&Event::Errored {
            code: 4000,
            message: "invalid client id".into(),
        });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn channel_forwards_every_kind() {
        let (h, rx) = EventHandlers::channel();
        let events = [
            Event::Ready { user: user("u1") },
            Event::Disconnected {
                code: 2,
                message: "bye".into(),
            },
            Event::Errored {
                code: 3,
                message: "bad".into(),
            },
            Event::JoinGame {
                secret: "j".into(),
            },
            Event::SpectateGame {
                secret: "s".into(),
            },
            Event::JoinRequest { user: user("u2") },
        ];
        for e in &events {
            h.dispatch(e);
        }
        let received: Vec<Event> = rx.try_iter().collect();
        assert_eq!(received, events);
    }

    #[test]
    fn debug_lists_installed_entries() {
        let h = EventHandlers::new().on_ready(|_| {});
        let s = format!("{h:?}");
        assert!(s.contains("ready: true"));
        assert!(s.contains("join_request: false"));
    }
}
