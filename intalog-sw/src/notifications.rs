//! Notifications & Clients
//!
//! User notification display (the `registration.showNotification` surface)
//! and the clients view the worker uses to claim pages and open windows.
//! Notifications with the same tag replace each other instead of stacking.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

// ── Errors ──────────────────────────────────────────────────

/// Push handling error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushError {
    /// Payload present but not decodable as text.
    InvalidPayload,
}

impl core::fmt::Display for PushError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PushError::InvalidPayload => write!(f, "push payload is not valid text"),
        }
    }
}

// ── Notification options ────────────────────────────────────

/// Options for a displayed notification.
#[derive(Debug, Clone)]
pub struct NotificationOptions {
    /// Title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Icon URL.
    pub icon: Option<String>,
    /// Badge URL.
    pub badge: Option<String>,
    /// De-duplication tag.
    pub tag: Option<String>,
    /// Vibration pattern.
    pub vibrate: Vec<u32>,
    /// Whether the notification stays until the user interacts with it.
    pub require_interaction: bool,
}

impl NotificationOptions {
    /// Create options with a title and empty body.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            icon: None,
            badge: None,
            tag: None,
            vibrate: Vec::new(),
            require_interaction: false,
        }
    }

    /// Set body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Set icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set badge.
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    /// Set tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set vibration pattern.
    pub fn with_vibrate(mut self, pattern: &[u32]) -> Self {
        self.vibrate = pattern.to_vec();
        self
    }

    /// Keep the notification until user interaction.
    pub fn require_interaction(mut self, value: bool) -> Self {
        self.require_interaction = value;
        self
    }
}

// ── Notification ────────────────────────────────────────────

/// A displayed notification.
#[derive(Debug, Clone)]
pub struct Notification {
    id: u64,
    options: NotificationOptions,
}

impl Notification {
    /// Get ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get title.
    pub fn title(&self) -> &str {
        &self.options.title
    }

    /// Get body.
    pub fn body(&self) -> &str {
        &self.options.body
    }

    /// Get tag.
    pub fn tag(&self) -> Option<&str> {
        self.options.tag.as_deref()
    }

    /// Get full options.
    pub fn options(&self) -> &NotificationOptions {
        &self.options
    }
}

// ── Notification center ─────────────────────────────────────

/// Active notifications for the worker's registration.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    notifications: Vec<Notification>,
    next_id: u64,
}

impl NotificationCenter {
    /// Create an empty center.
    pub const fn new() -> Self {
        Self {
            notifications: Vec::new(),
            next_id: 1,
        }
    }

    /// Display a notification. A prior notification carrying the same tag is
    /// replaced. Returns the new notification's ID.
    pub fn show(&mut self, options: NotificationOptions) -> u64 {
        if let Some(ref tag) = options.tag {
            self.notifications.retain(|n| n.tag() != Some(tag.as_str()));
        }

        let id = self.next_id;
        self.next_id += 1;

        log::debug!("[SW] showing notification {}: {}", id, options.title);
        self.notifications.push(Notification { id, options });
        id
    }

    /// Close a notification by ID. Returns whether one existed.
    pub fn close(&mut self, id: u64) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id() != id);
        self.notifications.len() != before
    }

    /// Get a notification by ID.
    pub fn get(&self, id: u64) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id() == id)
    }

    /// All notifications carrying the given tag.
    pub fn by_tag(&self, tag: &str) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| n.tag() == Some(tag))
            .collect()
    }

    /// Number of active notifications.
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    /// Whether no notification is active.
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

// ── Clients ─────────────────────────────────────────────────

/// The worker's view of its clients: claimed pages and opened windows.
#[derive(Debug, Default)]
pub struct Clients {
    claimed: bool,
    opened: Vec<String>,
}

impl Clients {
    /// Create with no claimed clients.
    pub const fn new() -> Self {
        Self {
            claimed: false,
            opened: Vec::new(),
        }
    }

    /// Take control of already-open pages.
    pub fn claim(&mut self) {
        self.claimed = true;
        log::debug!("[SW] clients claimed");
    }

    /// Whether `claim` was called.
    pub fn claimed(&self) -> bool {
        self.claimed
    }

    /// Open (or focus) a window at the given URL.
    pub fn open_window(&mut self, url: &str) {
        log::debug!("[SW] opening window at {}", url);
        self.opened.push(url.to_string());
    }

    /// URLs of windows opened by the worker, in order.
    pub fn opened_windows(&self) -> &[String] {
        &self.opened
    }
}

// ── Tests ───────────────────────────────────────────────────
