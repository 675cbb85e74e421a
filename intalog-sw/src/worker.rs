//! Service Worker
//!
//! The worker itself: owns the configuration, the cache storage, the
//! lifecycle state and the notification surface, and implements the six
//! event handlers the host dispatches.
//!
//! Fetch interception is network-first: every eligible GET goes to the
//! network, successful 200 responses are stored opportunistically, and the
//! cache is consulted only when the network fails. HTML navigations with no
//! cache entry fall back to the cached root document.

use alloc::string::String;
use alloc::vec::Vec;

use crate::cache::CacheStorage;
use crate::config::{WorkerConfig, ROOT_URL, SYNC_TAG};
use crate::events::{
    ActivateEvent, ExtendableEvent, FetchEvent, InstallEvent, NotificationClickEvent, PushEvent,
    SyncEvent,
};
use crate::fetch::{FetchResult, FetchSource, NetworkBackend, Request, RequestMethod};
use crate::lifecycle::{advance, WorkerState};
use crate::notifications::{Clients, NotificationCenter, NotificationOptions, PushError};
use crate::WorkerError;

/// A service worker instance for one registration.
pub struct ServiceWorker {
    /// Immutable configuration, fixed at construction.
    config: WorkerConfig,
    /// Lifecycle state.
    state: WorkerState,
    /// Cache buckets for the origin.
    storage: CacheStorage,
    /// Active notifications.
    notifications: NotificationCenter,
    /// Claimed pages and opened windows.
    clients: Clients,
    /// Whether the worker asked to activate without waiting.
    skip_waiting: bool,
}

impl ServiceWorker {
    /// Create a worker in the `Parsed` state.
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            config,
            state: WorkerState::Parsed,
            storage: CacheStorage::new(),
            notifications: NotificationCenter::new(),
            clients: Clients::new(),
            skip_waiting: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// The worker's configuration.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Cache buckets.
    pub fn caches(&self) -> &CacheStorage {
        &self.storage
    }

    /// Mutable cache buckets. The host uses this to surface buckets that
    /// persisted from prior worker versions.
    pub fn caches_mut(&mut self) -> &mut CacheStorage {
        &mut self.storage
    }

    /// Active notifications.
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// The worker's clients view.
    pub fn clients(&self) -> &Clients {
        &self.clients
    }

    /// Whether `skipWaiting` was signalled during install.
    pub fn skip_waiting(&self) -> bool {
        self.skip_waiting
    }

    /// Install handler: pre-populate the version-tagged bucket with every
    /// bootstrap resource. The batch is atomic — nothing is stored unless
    /// every fetch succeeds, and a failure fails the whole install.
    pub fn handle_install(
        &mut self,
        event: &mut InstallEvent,
        net: &dyn NetworkBackend,
    ) -> Result<(), WorkerError> {
        self.state = advance(self.state, WorkerState::Installing)?;
        event.wait_until();
        log::info!("[SW] installing {}", self.config.version_tag);

        // Fetch everything before storing anything, so a single failure
        // leaves the bucket unpopulated.
        let mut fetched = Vec::new();
        for url in &self.config.bootstrap_urls {
            let request = Request::get(url.clone());
            match net.fetch(&request) {
                Ok(response) => fetched.push((request, response)),
                Err(err) => {
                    log::warn!("[SW] bootstrap fetch failed for {}: {}", url, err);
                    self.state = advance(self.state, WorkerState::Redundant)?;
                    return Err(WorkerError::Fetch(err));
                }
            }
        }

        let count = fetched.len();
        let bucket = self.storage.open(&self.config.version_tag);
        for (request, response) in fetched {
            bucket.put(&request, response);
        }

        self.skip_waiting = true;
        self.state = advance(self.state, WorkerState::Installed)?;
        log::info!("[SW] install complete, {} resources cached", count);
        Ok(())
    }

    /// Activation handler: delete every bucket whose name is not the current
    /// version tag, then take control of open pages.
    pub fn handle_activate(&mut self, event: &mut ActivateEvent) -> Result<(), WorkerError> {
        self.state = advance(self.state, WorkerState::Activating)?;
        event.wait_until();
        log::info!("[SW] activating {}", self.config.version_tag);

        let stale: Vec<String> = self
            .storage
            .keys()
            .into_iter()
            .filter(|name| *name != self.config.version_tag)
            .collect();
        for name in stale {
            if self.storage.delete(&name) {
                log::info!("[SW] removed old cache {}", name);
            }
        }

        self.state = advance(self.state, WorkerState::Activated)?;
        self.clients.claim();
        Ok(())
    }

    /// Fetch interceptor. Non-GET requests and bypass-rule matches pass
    /// through untouched; everything else is network-first with the cache as
    /// fallback.
    pub fn handle_fetch(&mut self, event: &FetchEvent, net: &dyn NetworkBackend) -> FetchResult {
        if self.state != WorkerState::Activated {
            return FetchResult::Passthrough;
        }

        let request = event.request();
        if request.method != RequestMethod::Get {
            return FetchResult::Passthrough;
        }
        if self.config.is_bypassed(&request.url) {
            log::debug!("[SW] bypassing {}", request.url);
            return FetchResult::Passthrough;
        }

        match net.fetch(request) {
            Ok(response) => {
                if response.status == 200 {
                    let copy = response.clone_response();
                    self.storage.open(&self.config.version_tag).put(request, copy);
                }
                FetchResult::Response {
                    response,
                    source: FetchSource::Network,
                }
            }
            Err(err) => self.fetch_fallback(request, err),
        }
    }

    /// Cache fallback for a failed network fetch.
    fn fetch_fallback(&self, request: &Request, err: crate::fetch::FetchError) -> FetchResult {
        if let Some(cached) = self.storage.match_in(&self.config.version_tag, request) {
            log::debug!("[SW] serving {} from cache", request.url);
            return FetchResult::Response {
                response: cached.clone_response(),
                source: FetchSource::Cache,
            };
        }

        if request.accepts_html() {
            let root = Request::get(ROOT_URL);
            if let Some(cached) = self.storage.match_in(&self.config.version_tag, &root) {
                log::debug!("[SW] serving offline fallback page for {}", request.url);
                return FetchResult::Response {
                    response: cached.clone_response(),
                    source: FetchSource::Cache,
                };
            }
        }

        log::warn!("[SW] {} unreachable with no cache entry: {}", request.url, err);
        FetchResult::Error(err)
    }

    /// Background sync handler. `sync-data` is acknowledged but no data is
    /// transmitted yet.
    pub fn handle_sync(&mut self, event: &mut SyncEvent) {
        if event.tag() == SYNC_TAG {
            event.wait_until();
            log::info!("[SW] sync-data requested; nothing to transmit");
        }
    }

    /// Push handler: display a notification with the payload text, or the
    /// configured default when the push carries no payload.
    pub fn handle_push(&mut self, event: &mut PushEvent) -> Result<u64, PushError> {
        event.wait_until();

        let body = match event.text().map_err(|_| PushError::InvalidPayload)? {
            Some(text) => text,
            None => self.config.notification.default_body.clone(),
        };

        let defaults = &self.config.notification;
        let options = NotificationOptions::new(defaults.title.clone())
            .with_body(body)
            .with_icon(defaults.icon.clone())
            .with_badge(defaults.badge.clone())
            .with_tag(defaults.tag.clone())
            .with_vibrate(&defaults.vibrate)
            .require_interaction(defaults.require_interaction);

        Ok(self.notifications.show(options))
    }

    /// Notification-click handler: dismiss the notification and open a
    /// window at the root URL.
    pub fn handle_notification_click(&mut self, event: &mut NotificationClickEvent) {
        self.notifications.close(event.notification_id());
        event.wait_until();
        self.clients.open_window(ROOT_URL);
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BOOTSTRAP_URLS, CACHE_NAME};
    use crate::fetch::{FetchError, Response};
    use alloc::collections::BTreeMap;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    /// Programmed network: URL → response or failure. Unknown URLs are
    /// unreachable.
    struct StubNetwork {
        routes: BTreeMap<String, Result<Response, FetchError>>,
    }

    impl StubNetwork {
        fn new() -> Self {
            Self {
                routes: BTreeMap::new(),
            }
        }

        fn ok(mut self, url: &str, body: &[u8]) -> Self {
            self.routes
                .insert(url.to_string(), Ok(Response::new(200).with_body(body.to_vec())));
            self
        }

        fn status(mut self, url: &str, status: u16) -> Self {
            self.routes.insert(url.to_string(), Ok(Response::new(status)));
            self
        }

        fn fail(mut self, url: &str, err: FetchError) -> Self {
            self.routes.insert(url.to_string(), Err(err));
            self
        }
    }

    impl NetworkBackend for StubNetwork {
        fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
            self.routes
                .get(&request.url)
                .cloned()
                .unwrap_or(Err(FetchError::NetworkUnreachable))
        }
    }

    /// Network serving every bootstrap resource.
    fn shell_network() -> StubNetwork {
        let mut net = StubNetwork::new();
        for url in BOOTSTRAP_URLS {
            net = net.ok(url, b"<shell>");
        }
        net
    }

    /// Worker taken through install and activation.
    fn installed_worker(net: &dyn NetworkBackend) -> ServiceWorker {
        let mut worker = ServiceWorker::new(WorkerConfig::default());
        worker.handle_install(&mut InstallEvent::new(), net).unwrap();
        worker.handle_activate(&mut ActivateEvent::new()).unwrap();
        worker
    }

    #[test]
    fn install_precaches_every_bootstrap_resource() {
        let net = shell_network();
        let mut worker = ServiceWorker::new(WorkerConfig::default());
        worker.handle_install(&mut InstallEvent::new(), &net).unwrap();

        let bucket = worker.caches().get(CACHE_NAME).unwrap();
        assert_eq!(bucket.len(), BOOTSTRAP_URLS.len());
        for url in BOOTSTRAP_URLS {
            assert!(bucket.match_request(&Request::get(*url)).is_some());
        }
        assert_eq!(worker.state(), WorkerState::Installed);
        assert!(worker.skip_waiting());
    }

    #[test]
    fn failed_bootstrap_fetch_fails_install_atomically() {
        let net = shell_network().fail("/static/app/css/print.css", FetchError::Timeout);
        let mut worker = ServiceWorker::new(WorkerConfig::default());

        let result = worker.handle_install(&mut InstallEvent::new(), &net);
        assert!(matches!(result, Err(WorkerError::Fetch(_))));
        assert_eq!(worker.state(), WorkerState::Redundant);
        // No partial population: the bucket was never created.
        assert!(!worker.caches().has(CACHE_NAME));
    }

    #[test]
    fn activation_removes_stale_buckets() {
        let net = shell_network();
        let mut worker = ServiceWorker::new(WorkerConfig::default());
        worker.caches_mut().open("crm-intalog-v0");
        worker.caches_mut().open("crm-intalog-beta");

        worker.handle_install(&mut InstallEvent::new(), &net).unwrap();
        worker.handle_activate(&mut ActivateEvent::new()).unwrap();

        assert_eq!(worker.caches().keys(), [CACHE_NAME.to_string()]);
        assert_eq!(worker.state(), WorkerState::Activated);
        assert!(worker.clients().claimed());
    }

    #[test]
    fn activation_before_install_rejected() {
        let mut worker = ServiceWorker::new(WorkerConfig::default());
        let result = worker.handle_activate(&mut ActivateEvent::new());
        assert!(matches!(result, Err(WorkerError::InvalidStateTransition)));
    }

    #[test]
    fn fetch_before_activation_passes_through() {
        let net = shell_network();
        let mut worker = ServiceWorker::new(WorkerConfig::default());
        let event = FetchEvent::new(Request::get("/dashboard/"));
        assert!(matches!(
            worker.handle_fetch(&event, &net),
            FetchResult::Passthrough
        ));
    }

    #[test]
    fn successful_200_is_returned_and_cached() {
        let net = shell_network().ok("/dashboard/", b"<dash>");
        let mut worker = installed_worker(&net);

        let request = Request::get("/dashboard/");
        let result = worker.handle_fetch(&FetchEvent::new(request.clone()), &net);
        assert_eq!(result.source(), Some(FetchSource::Network));
        assert_eq!(result.response().unwrap().body, b"<dash>");

        let cached = worker.caches().match_in(CACHE_NAME, &request).unwrap();
        assert_eq!(cached.body, b"<dash>");
    }

    #[test]
    fn non_200_is_returned_but_not_cached() {
        let net = shell_network().status("/missing/", 404);
        let mut worker = installed_worker(&net);

        let request = Request::get("/missing/");
        let result = worker.handle_fetch(&FetchEvent::new(request.clone()), &net);
        assert_eq!(result.response().unwrap().status, 404);
        assert!(worker.caches().match_in(CACHE_NAME, &request).is_none());
    }

    #[test]
    fn redirect_status_is_not_cached() {
        let net = shell_network().status("/moved/", 301);
        let mut worker = installed_worker(&net);

        let request = Request::get("/moved/");
        worker.handle_fetch(&FetchEvent::new(request.clone()), &net);
        assert!(worker.caches().match_in(CACHE_NAME, &request).is_none());
    }

    #[test]
    fn offline_serves_prior_cache_entry_unchanged() {
        let online = shell_network().ok("/relatorio/", b"<report>");
        let mut worker = installed_worker(&online);
        let request = Request::get("/relatorio/");
        worker.handle_fetch(&FetchEvent::new(request.clone()), &online);

        let offline = StubNetwork::new();
        let result = worker.handle_fetch(&FetchEvent::new(request), &offline);
        assert_eq!(result.source(), Some(FetchSource::Cache));
        assert_eq!(result.response().unwrap().body, b"<report>");
    }

    #[test]
    fn offline_html_request_falls_back_to_root_document() {
        let net = shell_network();
        let mut worker = installed_worker(&net);

        let offline = StubNetwork::new();
        let request = Request::get("/nunca-visitada/").with_header("Accept", "text/html");
        let result = worker.handle_fetch(&FetchEvent::new(request), &offline);
        assert_eq!(result.source(), Some(FetchSource::Cache));
        assert_eq!(result.response().unwrap().body, b"<shell>");
    }

    #[test]
    fn offline_html_request_without_root_propagates_error() {
        // Worker installed with no bootstrap resources at all.
        let mut config = WorkerConfig::default();
        config.bootstrap_urls = Vec::new();
        let net = StubNetwork::new();
        let mut worker = ServiceWorker::new(config);
        worker.handle_install(&mut InstallEvent::new(), &net).unwrap();
        worker.handle_activate(&mut ActivateEvent::new()).unwrap();

        let request = Request::get("/pagina/").with_header("Accept", "text/html");
        let result = worker.handle_fetch(&FetchEvent::new(request), &net);
        assert!(matches!(
            result,
            FetchResult::Error(FetchError::NetworkUnreachable)
        ));
    }

    #[test]
    fn offline_request_without_accept_header_propagates_error() {
        let net = shell_network();
        let mut worker = installed_worker(&net);

        let offline = StubNetwork::new();
        let request = Request::get("/api/clientes/");
        let result = worker.handle_fetch(&FetchEvent::new(request), &offline);
        assert!(matches!(result, FetchResult::Error(_)));
    }

    #[test]
    fn non_get_passes_through_untouched() {
        let net = shell_network().ok("/api/leads/", b"created");
        let mut worker = installed_worker(&net);

        let request = Request::new(RequestMethod::Post, "/api/leads/");
        let result = worker.handle_fetch(&FetchEvent::new(request.clone()), &net);
        assert!(matches!(result, FetchResult::Passthrough));
        assert!(worker.caches().match_in(CACHE_NAME, &request).is_none());
    }

    #[test]
    fn bypass_rules_pass_through_and_never_cache() {
        let net = shell_network()
            .ok("https://crm.example.com/admin/", b"admin")
            .ok("https://brasilapi.com.br/api/cep/v1/01001000", b"cep")
            .ok("https://cdnjs.cloudflare.com/ajax/libs/x.js", b"js")
            .ok("https://cdn.jsdelivr.net/npm/chart.js", b"js");
        let mut worker = installed_worker(&net);

        for url in [
            "https://crm.example.com/admin/",
            "https://brasilapi.com.br/api/cep/v1/01001000",
            "https://cdnjs.cloudflare.com/ajax/libs/x.js",
            "https://cdn.jsdelivr.net/npm/chart.js",
        ] {
            let request = Request::get(url);
            let result = worker.handle_fetch(&FetchEvent::new(request.clone()), &net);
            assert!(matches!(result, FetchResult::Passthrough));
            assert!(worker.caches().match_in(CACHE_NAME, &request).is_none());
        }
    }

    #[test]
    fn sync_data_tag_is_acknowledged() {
        let net = shell_network();
        let mut worker = installed_worker(&net);

        let mut event = SyncEvent::new("sync-data");
        worker.handle_sync(&mut event);
        assert!(event.has_wait_until());

        let mut other = SyncEvent::new("outro");
        worker.handle_sync(&mut other);
        assert!(!other.has_wait_until());
    }

    #[test]
    fn push_without_payload_uses_default_body() {
        let net = shell_network();
        let mut worker = installed_worker(&net);

        let id = worker.handle_push(&mut PushEvent::new(None)).unwrap();
        let n = worker.notifications().get(id).unwrap();
        assert_eq!(n.body(), "Nova atualização disponível!");
        assert_eq!(n.title(), "CRM - INTALOG");
        assert!(n.options().require_interaction);
        assert_eq!(n.options().vibrate, [200, 100, 200]);
    }

    #[test]
    fn push_with_payload_uses_payload_text() {
        let net = shell_network();
        let mut worker = installed_worker(&net);

        let mut event = PushEvent::new(Some(b"X".to_vec()));
        let id = worker.handle_push(&mut event).unwrap();
        assert_eq!(worker.notifications().get(id).unwrap().body(), "X");
    }

    #[test]
    fn push_with_unreadable_payload_errors() {
        let net = shell_network();
        let mut worker = installed_worker(&net);

        let mut event = PushEvent::new(Some(alloc::vec![0xff, 0xfe]));
        assert_eq!(
            worker.handle_push(&mut event),
            Err(PushError::InvalidPayload)
        );
        assert!(worker.notifications().is_empty());
    }

    #[test]
    fn repeated_pushes_replace_by_tag() {
        let net = shell_network();
        let mut worker = installed_worker(&net);

        worker.handle_push(&mut PushEvent::new(Some(b"um".to_vec()))).unwrap();
        let second = worker
            .handle_push(&mut PushEvent::new(Some(b"dois".to_vec())))
            .unwrap();

        assert_eq!(worker.notifications().len(), 1);
        assert_eq!(worker.notifications().get(second).unwrap().body(), "dois");
    }

    #[test]
    fn notification_click_closes_and_opens_one_window() {
        let net = shell_network();
        let mut worker = installed_worker(&net);

        let id = worker.handle_push(&mut PushEvent::new(None)).unwrap();
        worker.handle_notification_click(&mut NotificationClickEvent::new(id));

        assert!(worker.notifications().is_empty());
        assert_eq!(worker.clients().opened_windows(), ["/"]);
    }
}
