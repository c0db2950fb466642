//! Session countdown shown in the header.
//!
//! The server is polled periodically for the remaining seconds and the value
//! counts down locally in between. Logout is requested once, when the count
//! reaches zero.

use crate::types::SessionRemaining;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Unchanged,
    Remaining(i64),
    /// Emitted once per expiry; the caller logs out.
    Expired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCountdown {
    remaining: Option<i64>,
    expired: bool,
}

/// Guarded parse of a `/session/remaining` body; anything but a JSON object
/// with a numeric `remaining` is ignored.
pub fn parse_remaining(body: &str) -> Option<i64> {
    serde_json::from_str::<SessionRemaining>(body).ok()?.remaining
}

impl SessionCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> Option<i64> {
        self.remaining
    }

    /// Applies a server value.
    pub fn sync(&mut self, remaining: i64) -> SessionEvent {
        self.remaining = Some(remaining.max(0));
        self.check(remaining)
    }

    /// One local second elapsed.
    pub fn tick(&mut self) -> SessionEvent {
        match self.remaining {
            None => SessionEvent::Unchanged,
            Some(r) => {
                let next = (r - 1).max(0);
                self.remaining = Some(next);
                self.check(next)
            }
        }
    }

    fn check(&mut self, value: i64) -> SessionEvent {
        if value <= 0 {
            if self.expired {
                return SessionEvent::Unchanged;
            }
            self.expired = true;
            SessionEvent::Expired
        } else {
            self.expired = false;
            SessionEvent::Remaining(value)
        }
    }

    /// `mm:ss`, or an empty string before the first sync.
    pub fn label(&self) -> String {
        match self.remaining {
            Some(r) => format!("{:02}:{:02}", r / 60, r % 60),
            None => String::new(),
        }
    }
}
