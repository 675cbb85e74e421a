//! INTALOG Service Worker
//!
//! Offline-first service worker for the CRM-INTALOG progressive web app.
//! Pre-caches the app shell at install, retires stale cache buckets at
//! activation, and intercepts GET traffic network-first with the cache as
//! fallback, so the CRM keeps rendering when the connection drops. Also
//! surfaces push notifications and a background-sync hook.
//!
//! The crate is host-agnostic: the embedding runtime dispatches events into
//! [`ServiceWorker`] and supplies its transport through [`NetworkBackend`].

#![no_std]

extern crate alloc;

pub mod cache;
pub mod config;
pub mod events;
pub mod fetch;
pub mod lifecycle;
pub mod notifications;
pub mod worker;

pub use cache::{Cache, CacheError, CacheStorage};
pub use config::{NotificationDefaults, WorkerConfig};
pub use events::{
    ActivateEvent, EventType, ExtendableEvent, FetchEvent, InstallEvent, NotificationClickEvent,
    PushEvent, SyncEvent,
};
pub use fetch::{
    FetchError, FetchResult, FetchSource, NetworkBackend, Request, RequestMethod, Response,
};
pub use lifecycle::WorkerState;
pub use notifications::{Notification, NotificationCenter, NotificationOptions, PushError};
pub use worker::ServiceWorker;

use spin::RwLock;

/// Top-level worker error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// Lifecycle transition violated the state machine.
    InvalidStateTransition,
    /// Cache storage failure.
    Cache(CacheError),
    /// Network failure that fails the operation outright.
    Fetch(FetchError),
}

impl core::fmt::Display for WorkerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WorkerError::InvalidStateTransition => write!(f, "invalid lifecycle transition"),
            WorkerError::Cache(e) => write!(f, "cache error: {}", e),
            WorkerError::Fetch(e) => write!(f, "fetch error: {}", e),
        }
    }
}

impl From<CacheError> for WorkerError {
    fn from(e: CacheError) -> Self {
        WorkerError::Cache(e)
    }
}

impl From<FetchError> for WorkerError {
    fn from(e: FetchError) -> Self {
        WorkerError::Fetch(e)
    }
}

/// The registered worker instance, if any.
static WORKER: RwLock<Option<ServiceWorker>> = RwLock::new(None);

/// Register a worker for the origin, replacing any prior registration.
pub fn register(config: WorkerConfig) {
    log::info!("[SW] registering worker {}", config.version_tag);
    *WORKER.write() = Some(ServiceWorker::new(config));
}

/// Run a closure against the registered worker. Returns `None` when no
/// worker is registered.
pub fn with_worker<R>(f: impl FnOnce(&mut ServiceWorker) -> R) -> Option<R> {
    WORKER.write().as_mut().map(f)
}
