//! Cache Storage
//!
//! Named response buckets backing the worker's offline strategy. A bucket
//! maps request identity (`METHOD:URL`) to a complete stored response; the
//! storage manages buckets by name. The host platform persists buckets
//! across sessions; this module owns the in-memory view the worker operates
//! on.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::fetch::{Request, Response};

// ── Errors ──────────────────────────────────────────────────

/// Cache storage error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Named bucket does not exist.
    NotFound,
    /// Entry data could not be stored.
    InvalidData(String),
}

impl core::fmt::Display for CacheError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CacheError::NotFound => write!(f, "cache bucket not found"),
            CacheError::InvalidData(s) => write!(f, "invalid cache data: {}", s),
        }
    }
}

// ── Cache bucket ────────────────────────────────────────────

/// A named cache bucket (the JS `Cache` object).
#[derive(Debug, Clone)]
pub struct Cache {
    /// Bucket name (e.g. `"crm-intalog-v1"`).
    name: String,
    /// Request key → stored response.
    entries: BTreeMap<String, Response>,
}

impl Cache {
    /// Create a new empty bucket.
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            entries: BTreeMap::new(),
        }
    }

    /// Bucket name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store a response keyed by the request. Replaces any prior entry for
    /// the same key.
    pub fn put(&mut self, request: &Request, response: Response) {
        self.entries.insert(make_key(request), response);
    }

    /// Look up the stored response for a request.
    pub fn match_request(&self, request: &Request) -> Option<&Response> {
        self.entries.get(&make_key(request))
    }

    /// Delete the entry for a request. Returns whether one existed.
    pub fn delete(&mut self, request: &Request) -> bool {
        self.entries.remove(&make_key(request)).is_some()
    }

    /// All stored request keys.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(|k| k.as_str()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Request identity used as the bucket key.
fn make_key(request: &Request) -> String {
    alloc::format!("{}:{}", request.method.as_str(), request.url)
}

// ── Cache storage ───────────────────────────────────────────

/// All cache buckets for the origin (the JS `caches` object).
#[derive(Debug, Default)]
pub struct CacheStorage {
    /// name → bucket.
    caches: BTreeMap<String, Cache>,
}

impl CacheStorage {
    /// Create an empty storage.
    pub const fn new() -> Self {
        Self {
            caches: BTreeMap::new(),
        }
    }

    /// Open a bucket, creating it if absent.
    pub fn open(&mut self, name: &str) -> &mut Cache {
        if !self.caches.contains_key(name) {
            self.caches.insert(name.to_string(), Cache::new(name));
        }
        self.caches.get_mut(name).unwrap()
    }

    /// Whether a bucket with this name exists.
    pub fn has(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    /// Delete a bucket by name. Returns whether one existed.
    pub fn delete(&mut self, name: &str) -> bool {
        self.caches.remove(name).is_some()
    }

    /// All bucket names.
    pub fn keys(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    /// Look up a request in a specific bucket.
    pub fn match_in(&self, name: &str, request: &Request) -> Option<&Response> {
        self.caches.get(name)?.match_request(request)
    }

    /// Read-only access to a bucket.
    pub fn get(&self, name: &str) -> Option<&Cache> {
        self.caches.get(name)
    }
}

// ── Tests ───────────────────────────────────────────────────
