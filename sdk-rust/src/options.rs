use crate::{DeprecationObserver, TracingDeprecationObserver, VeniceError, VeniceResult};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use std::{collections::HashMap, env, fmt, sync::Arc, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://api.venice.ai/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const API_KEY_ENV: &str = "VENICE_API_KEY";
pub const BASE_URL_ENV: &str = "VENICE_BASE_URL";

const USER_AGENT: &str = concat!("venice-rust/", env!("CARGO_PKG_VERSION"));

/// Options to create a client. Unset fields fall back to the environment and
/// then to the defaults.
#[derive(Clone, Default)]
pub struct ClientOptions {
    /// Defaults to `VENICE_API_KEY`. Required.
    pub api_key: Option<String>,
    /// Defaults to `VENICE_BASE_URL`, then to [`DEFAULT_BASE_URL`].
    pub base_url: Option<String>,
    /// Applied to every call unless overridden with `with_timeout`.
    pub timeout: Option<Duration>,
    /// Recorded for the transport. The SDK itself never retries.
    pub max_retries: Option<u32>,
    /// Extra headers sent with every request.
    pub headers: Option<HashMap<String, String>>,
    /// A preconfigured HTTP client for the async client. Ignored by the
    /// blocking client.
    pub client: Option<reqwest::Client>,
    /// Receives model deprecation advisories. Defaults to a `tracing`
    /// warning.
    pub deprecation_observer: Option<Arc<dyn DeprecationObserver>>,
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("headers", &self.headers)
            .field("client", &self.client)
            .field(
                "deprecation_observer",
                &self.deprecation_observer.as_ref().map(|_| "Observer"),
            )
            .finish()
    }
}

impl ClientOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_deprecation_observer(mut self, observer: impl DeprecationObserver + 'static) -> Self {
        self.deprecation_observer = Some(Arc::new(observer));
        self
    }
}

/// Fully resolved client configuration.
#[derive(Clone)]
pub(crate) struct ResolvedOptions {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub headers: HeaderMap,
    pub deprecation_observer: Arc<dyn DeprecationObserver>,
}

impl ResolvedOptions {
    /// Fails before any network activity when no API key can be found.
    pub fn resolve(options: &ClientOptions) -> VeniceResult<Self> {
        let api_key = options
            .api_key
            .clone()
            .or_else(|| env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                VeniceError::Configuration(format!(
                    "API key required. Set {API_KEY_ENV} or pass api_key."
                ))
            })?;

        let base_url = options
            .base_url
            .clone()
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            base_url,
            timeout: options.timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_retries: options.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            headers: default_headers(&api_key, options.headers.as_ref())?,
            deprecation_observer: options
                .deprecation_observer
                .clone()
                .unwrap_or_else(|| Arc::new(TracingDeprecationObserver)),
        })
    }
}

fn default_headers(
    api_key: &str,
    extra: Option<&HashMap<String, String>>,
) -> VeniceResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth_header = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|error| {
        VeniceError::Configuration(format!("Invalid API key header value: {error}"))
    })?;
    auth_header.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, auth_header);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

    for (key, value) in extra.into_iter().flatten() {
        let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
            VeniceError::Configuration(format!("Invalid header name '{key}': {error}"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|error| {
            VeniceError::Configuration(format!("Invalid header value for '{key}': {error}"))
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
