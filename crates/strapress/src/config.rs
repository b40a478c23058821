/// Default Strapi address for local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:1337";

/// Webhook events the site subscribes to
pub const WEBHOOK_EVENTS: [&str; 5] = [
    "entry.create",
    "entry.update",
    "entry.delete",
    "entry.publish",
    "entry.unpublish",
];

/// Webhook settings. Carried with the configuration for the receiver that
/// validates Strapi callbacks; the query client never reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookConfig {
    pub secret: String,
    pub events: Vec<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            events: WEBHOOK_EVENTS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Strapi configuration from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct StrapiConfig {
    pub base_url: String,
    /// Empty means unauthenticated requests
    pub api_token: String,
    pub webhooks: WebhookConfig,
}

impl Default for StrapiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: String::new(),
            webhooks: WebhookConfig::default(),
        }
    }
}

impl StrapiConfig {
    /// Load configuration from environment variables
    /// Uses STRAPI_BASE_URL with default fallback
    /// Uses STRAPI_API_TOKEN and STRAPI_WEBHOOK_SECRET, empty when unset
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            base_url: get("STRAPI_BASE_URL").unwrap_or(defaults.base_url),
            api_token: get("STRAPI_API_TOKEN").unwrap_or(defaults.api_token),
            webhooks: WebhookConfig {
                secret: get("STRAPI_WEBHOOK_SECRET").unwrap_or(defaults.webhooks.secret),
                events: defaults.webhooks.events,
            },
        }
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, base_url: Option<String>, api_token: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(token) = api_token {
            self.api_token = token;
        }
        self
    }
}
