//! Explicit session ownership and change notification.
//!
//! The composition root holds one [`SessionManager`] and passes it where
//! needed; there is no ambient auth context. Subscribers are notified on
//! sign-in, sign-out, and idle expiry.

use std::time::{Duration, Instant};

use crate::auth::Session;

/// A change to the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
    /// The session was invalidated because the app stayed hidden past the
    /// idle timeout.
    Expired,
}

type Listener = Box<dyn Fn(SessionEvent) + Send>;

/// Owns the current session and its idle-expiry bookkeeping.
///
/// The app marks itself hidden/visible around focus changes; if more than the
/// idle timeout elapses while hidden, the session is dropped on the next
/// [`SessionManager::mark_visible`].
pub struct SessionManager {
    session: Option<Session>,
    hidden_at: Option<Instant>,
    idle_timeout: Duration,
    listeners: Vec<Listener>,
}

impl SessionManager {
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            session: None,
            hidden_at: None,
            idle_timeout,
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Registers a callback invoked on every session change.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(SessionEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Installs a freshly signed-in session.
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
        self.hidden_at = None;
        self.notify(SessionEvent::SignedIn);
    }

    /// Drops the current session, returning it for the caller to sign out
    /// with. No-op when not signed in.
    pub fn clear(&mut self) -> Option<Session> {
        let session = self.session.take();
        if session.is_some() {
            self.notify(SessionEvent::SignedOut);
        }
        session
    }

    /// Records that the app became hidden at `now`.
    pub fn mark_hidden(&mut self, now: Instant) {
        self.hidden_at = Some(now);
    }

    /// Records that the app became visible at `now`.
    ///
    /// Returns `true` if the session was invalidated because the hidden span
    /// exceeded the idle timeout.
    pub fn mark_visible(&mut self, now: Instant) -> bool {
        let Some(hidden_at) = self.hidden_at.take() else {
            return false;
        };
        if self.session.is_some() && now.duration_since(hidden_at) > self.idle_timeout {
            self.session = None;
            self.notify(SessionEvent::Expired);
            return true;
        }
        false
    }

    fn notify(&self, event: SessionEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}
