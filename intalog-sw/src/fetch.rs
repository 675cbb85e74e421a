//! Fetch Types
//!
//! Request/response representations, the network seam the host plugs into,
//! and the result type the interceptor hands back to the page.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

// ── Request ─────────────────────────────────────────────────

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Default for RequestMethod {
    fn default() -> Self {
        Self::Get
    }
}

impl RequestMethod {
    /// Convert to the wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

/// An outgoing request the host intercepted.
#[derive(Debug, Clone)]
pub struct Request {
    /// Target URL.
    pub url: String,
    /// HTTP method.
    pub method: RequestMethod,
    /// Request headers (name → value).
    pub headers: BTreeMap<String, String>,
}

impl Request {
    /// Create a GET request with no headers.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: RequestMethod::Get,
            headers: BTreeMap::new(),
        }
    }

    /// Create a request with an explicit method.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: BTreeMap::new(),
        }
    }

    /// Add a header (builder style).
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Look up a header value, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the `Accept` header indicates an HTML document.
    ///
    /// A request without an `Accept` header is treated as not HTML.
    pub fn accepts_html(&self) -> bool {
        self.header("accept")
            .map(|v| v.contains("text/html"))
            .unwrap_or(false)
    }
}

// ── Response ────────────────────────────────────────────────

/// A network or cached response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Status text.
    pub status_text: String,
    /// Response headers (name → value).
    pub headers: BTreeMap<String, String>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl Response {
    /// Create an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            status_text: status_text_for(status).to_string(),
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// Set the body (builder style).
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header (builder style).
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Whether the status is in the 2xx range.
    pub fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Duplicate the response. A body can be consumed only once by the page,
    /// so the copy is what goes into the cache.
    pub fn clone_response(&self) -> Self {
        self.clone()
    }
}

/// Status text for common status codes.
fn status_text_for(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

// ── Network seam ────────────────────────────────────────────

/// A failed network fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No route to the origin (offline).
    NetworkUnreachable,
    /// The fetch timed out.
    Timeout,
    /// Name resolution failed.
    Dns(String),
    /// Any other transport failure.
    Other(String),
}

impl core::fmt::Display for FetchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FetchError::NetworkUnreachable => write!(f, "network unreachable"),
            FetchError::Timeout => write!(f, "fetch timed out"),
            FetchError::Dns(host) => write!(f, "DNS resolution failed: {}", host),
            FetchError::Other(msg) => write!(f, "fetch failed: {}", msg),
        }
    }
}

/// The host's network stack, as seen by the worker.
///
/// Every live fetch the worker issues goes through this trait; the host
/// installs its real transport, tests install a programmed stub.
pub trait NetworkBackend {
    /// Perform a live network fetch.
    fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

// ── Interception result ─────────────────────────────────────

/// Where an intercepted response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    /// Served from a cache bucket.
    Cache,
    /// Served from the live network.
    Network,
}

/// What the interceptor hands back to the page.
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// A response, with its origin.
    Response {
        response: Response,
        source: FetchSource,
    },
    /// Not intercepted — the request proceeds to the network untouched.
    Passthrough,
    /// Both network and cache failed; the rejection reaches the page.
    Error(FetchError),
}

impl FetchResult {
    /// The response, if one was produced.
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchResult::Response { response, .. } => Some(response),
            _ => None,
        }
    }

    /// The source, if a response was produced.
    pub fn source(&self) -> Option<FetchSource> {
        match self {
            FetchResult::Response { source, .. } => Some(*source),
            _ => None,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────
