//! Worker Events
//!
//! The lifecycle and functional events the host dispatches to the worker.
//! Each event is extendable: a handler that performs asynchronous-equivalent
//! work calls `wait_until`, telling the host to keep the worker alive until
//! that work settles.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::fetch::Request;

/// Event type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Install event
    Install,
    /// Activate event
    Activate,
    /// Fetch event
    Fetch,
    /// Sync event
    Sync,
    /// Push event
    Push,
    /// Notification click event
    NotificationClick,
}

/// Extendable event trait.
pub trait ExtendableEvent {
    /// Get event type
    fn event_type(&self) -> EventType;

    /// Extend the event's lifetime until the handler's work settles
    fn wait_until(&mut self);

    /// Check if wait_until was called
    fn has_wait_until(&self) -> bool;
}

/// Install lifecycle event.
#[derive(Debug, Clone, Default)]
pub struct InstallEvent {
    /// Whether wait_until was called
    wait_until: bool,
}

impl InstallEvent {
    /// Create new install event
    pub fn new() -> Self {
        Self { wait_until: false }
    }
}

impl ExtendableEvent for InstallEvent {
    fn event_type(&self) -> EventType {
        EventType::Install
    }

    fn wait_until(&mut self) {
        self.wait_until = true;
    }

    fn has_wait_until(&self) -> bool {
        self.wait_until
    }
}

/// Activate lifecycle event.
#[derive(Debug, Clone, Default)]
pub struct ActivateEvent {
    /// Whether wait_until was called
    wait_until: bool,
}

impl ActivateEvent {
    /// Create new activate event
    pub fn new() -> Self {
        Self { wait_until: false }
    }
}

impl ExtendableEvent for ActivateEvent {
    fn event_type(&self) -> EventType {
        EventType::Activate
    }

    fn wait_until(&mut self) {
        self.wait_until = true;
    }

    fn has_wait_until(&self) -> bool {
        self.wait_until
    }
}

/// Fetch interception event.
#[derive(Debug, Clone)]
pub struct FetchEvent {
    /// The intercepted request
    request: Request,
    /// Whether wait_until was called
    wait_until: bool,
}

impl FetchEvent {
    /// Create new fetch event
    pub fn new(request: Request) -> Self {
        Self {
            request,
            wait_until: false,
        }
    }

    /// Get the intercepted request
    pub fn request(&self) -> &Request {
        &self.request
    }
}

impl ExtendableEvent for FetchEvent {
    fn event_type(&self) -> EventType {
        EventType::Fetch
    }

    fn wait_until(&mut self) {
        self.wait_until = true;
    }

    fn has_wait_until(&self) -> bool {
        self.wait_until
    }
}

/// Background sync event.
#[derive(Debug, Clone)]
pub struct SyncEvent {
    /// Registration tag
    tag: String,
    /// Whether wait_until was called
    wait_until: bool,
}

impl SyncEvent {
    /// Create new sync event
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            wait_until: false,
        }
    }

    /// Get the registration tag
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl ExtendableEvent for SyncEvent {
    fn event_type(&self) -> EventType {
        EventType::Sync
    }

    fn wait_until(&mut self) {
        self.wait_until = true;
    }

    fn has_wait_until(&self) -> bool {
        self.wait_until
    }
}

/// Push event, optionally carrying a payload.
#[derive(Debug, Clone)]
pub struct PushEvent {
    /// Push payload bytes
    data: Option<Vec<u8>>,
    /// Whether wait_until was called
    wait_until: bool,
}

impl PushEvent {
    /// Create new push event
    pub fn new(data: Option<Vec<u8>>) -> Self {
        Self {
            data,
            wait_until: false,
        }
    }

    /// Get raw payload bytes
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Decode the payload as UTF-8 text. `Ok(None)` when no payload is
    /// present; `Err` when a payload exists but is not valid text.
    pub fn text(&self) -> Result<Option<String>, core::str::Utf8Error> {
        match self.data.as_ref() {
            Some(bytes) => core::str::from_utf8(bytes).map(|s| Some(s.to_string())),
            None => Ok(None),
        }
    }
}

impl ExtendableEvent for PushEvent {
    fn event_type(&self) -> EventType {
        EventType::Push
    }

    fn wait_until(&mut self) {
        self.wait_until = true;
    }

    fn has_wait_until(&self) -> bool {
        self.wait_until
    }
}

/// Notification click event.
#[derive(Debug, Clone)]
pub struct NotificationClickEvent {
    /// ID of the clicked notification
    notification_id: u64,
    /// Whether wait_until was called
    wait_until: bool,
}

impl NotificationClickEvent {
    /// Create new notification click event
    pub fn new(notification_id: u64) -> Self {
        Self {
            notification_id,
            wait_until: false,
        }
    }

    /// Get the clicked notification's ID
    pub fn notification_id(&self) -> u64 {
        self.notification_id
    }
}

impl ExtendableEvent for NotificationClickEvent {
    fn event_type(&self) -> EventType {
        EventType::NotificationClick
    }

    fn wait_until(&mut self) {
        self.wait_until = true;
    }

    fn has_wait_until(&self) -> bool {
        self.wait_until
    }
}
