//! Transient user-facing notices.
//!
//! Every failure in the dashboard is caught at its call site and
//! reported here; nothing is persisted and nothing propagates as an
//! unhandled fault. Sticky notices (e.g. "mint in progress") stay up
//! until explicitly dismissed by the flow that published them.

use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

/// A single transient notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub text: String,
    /// Optional link (e.g. a block explorer transaction URL)
    pub link: Option<String>,
    /// Sticky notices stay up until dismissed
    pub sticky: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            text: text.into(),
            link: None,
            sticky: false,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            text: text.into(),
            link: None,
            sticky: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            text: text.into(),
            link: None,
            sticky: false,
        }
    }

    /// Sticky progress notice with an optional link.
    pub fn progress(text: impl Into<String>, link: Option<String>) -> Self {
        Self {
            level: Level::Info,
            text: text.into(),
            link,
            sticky: true,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.link {
            Some(link) => write!(f, "{} ({})", self.text, link),
            None => write!(f, "{}", self.text),
        }
    }
}

/// Sink for user-facing notices.
pub trait Notifier: Send + Sync {
    fn publish(&self, notice: Notice);

    /// Dismiss any sticky progress notice currently shown.
    fn dismiss_progress(&self);
}

/// Notifier that renders notices through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn publish(&self, notice: Notice) {
        match notice.level {
            Level::Info | Level::Success => info!("{}", notice),
            Level::Error => error!("{}", notice),
        }
    }

    fn dismiss_progress(&self) {}
}

/// Notifier that records notices in memory, for tests and embedders.
#[derive(Debug, Clone, Default)]
pub struct CaptureNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl CaptureNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices published so far, in order.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notifier lock poisoned").clone()
    }

    /// Whether any published notice text contains the given fragment.
    pub fn contains(&self, fragment: &str) -> bool {
        self.notices().iter().any(|n| n.text.contains(fragment))
    }
}

impl Notifier for CaptureNotifier {
    fn publish(&self, notice: Notice) {
        self.notices
            .lock()
            .expect("notifier lock poisoned")
            .push(notice);
    }

    fn dismiss_progress(&self) {
        self.notices
            .lock()
            .expect("notifier lock poisoned")
            .retain(|n| !n.sticky);
    }
}
