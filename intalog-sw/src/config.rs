//! Worker Configuration
//!
//! Every externally tunable value the worker consumes: the version tag that
//! names the current cache bucket, the bootstrap resources pre-cached at
//! install, the bypass rules excluded from interception, and the notification
//! presentation constants. All of them are load-time literals; a config is
//! immutable once constructed.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Version tag naming the current cache bucket.
pub const CACHE_NAME: &str = "crm-intalog-v1";

/// Resources pre-cached at install so the app shell works offline.
pub const BOOTSTRAP_URLS: &[&str] = &[
    "/",
    "/static/app/css/print.css",
    "/static/icons/icon-192x192.png",
    "/static/icons/icon-512x512.png",
];

/// URL substrings that skip interception entirely. Admin routes must always
/// hit the network; the third-party origins are not ours to cache.
pub const BYPASS_RULES: &[&str] = &[
    "/admin/",
    "brasilapi.com.br",
    "cdnjs.cloudflare.com",
    "cdn.jsdelivr.net",
];

/// Background sync tag the worker responds to.
pub const SYNC_TAG: &str = "sync-data";

/// Root document URL, served as the offline fallback page.
pub const ROOT_URL: &str = "/";

/// Notification title.
pub const NOTIFICATION_TITLE: &str = "CRM - INTALOG";

/// Notification body used when a push event carries no payload.
pub const DEFAULT_PUSH_BODY: &str = "Nova atualização disponível!";

/// Notification icon path.
pub const NOTIFICATION_ICON: &str = "/static/icons/icon-192x192.png";

/// Notification badge path.
pub const NOTIFICATION_BADGE: &str = "/static/icons/icon-72x72.png";

/// Notification de-duplication tag.
pub const NOTIFICATION_TAG: &str = "crm-intalog-notification";

/// Notification vibration pattern (ms on / off / on).
pub const VIBRATION_PATTERN: &[u32] = &[200, 100, 200];

/// Immutable worker configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Version tag for the current cache bucket.
    pub version_tag: String,
    /// Bootstrap resource URLs cached at install.
    pub bootstrap_urls: Vec<String>,
    /// URL-substring predicates excluded from interception.
    pub bypass_rules: Vec<String>,
    /// Notification presentation constants.
    pub notification: NotificationDefaults,
}

/// Presentation constants for push notifications.
#[derive(Debug, Clone)]
pub struct NotificationDefaults {
    /// Title shown on every notification.
    pub title: String,
    /// Body used when a push carries no payload.
    pub default_body: String,
    /// Icon path.
    pub icon: String,
    /// Badge path.
    pub badge: String,
    /// De-duplication tag.
    pub tag: String,
    /// Vibration pattern.
    pub vibrate: Vec<u32>,
    /// Whether the notification stays until the user interacts with it.
    pub require_interaction: bool,
}

impl WorkerConfig {
    /// Check whether a URL matches any bypass rule.
    pub fn is_bypassed(&self, url: &str) -> bool {
        self.bypass_rules.iter().any(|rule| url.contains(rule.as_str()))
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            version_tag: CACHE_NAME.to_string(),
            bootstrap_urls: BOOTSTRAP_URLS.iter().map(|u| u.to_string()).collect(),
            bypass_rules: BYPASS_RULES.iter().map(|r| r.to_string()).collect(),
            notification: NotificationDefaults::default(),
        }
    }
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            default_body: DEFAULT_PUSH_BODY.to_string(),
            icon: NOTIFICATION_ICON.to_string(),
            badge: NOTIFICATION_BADGE.to_string(),
            tag: NOTIFICATION_TAG.to_string(),
            vibrate: VIBRATION_PATTERN.to_vec(),
            require_interaction: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = WorkerConfig::default();
        assert_eq!(config.version_tag, "crm-intalog-v1");
        assert_eq!(config.bootstrap_urls.len(), 4);
        assert_eq!(config.bootstrap_urls[0], "/");
        assert_eq!(config.bypass_rules.len(), 4);
        assert_eq!(config.notification.title, "CRM - INTALOG");
        assert!(config.notification.require_interaction);
    }

    #[test]
    fn test_bypass_admin_route() {
        let config = WorkerConfig::default();
        assert!(config.is_bypassed("https://crm.example.com/admin/login/"));
        assert!(!config.is_bypassed("https://crm.example.com/dashboard/"));
    }

    #[test]
    fn test_bypass_third_party_origins() {
        let config = WorkerConfig::default();
        assert!(config.is_bypassed("https://brasilapi.com.br/api/cep/v1/01001000"));
        assert!(config.is_bypassed("https://cdnjs.cloudflare.com/ajax/libs/x.js"));
        assert!(config.is_bypassed("https://cdn.jsdelivr.net/npm/chart.js"));
    }

    #[test]
    fn test_vibration_pattern() {
        let defaults = NotificationDefaults::default();
        assert_eq!(defaults.vibrate, [200, 100, 200]);
    }
}
