use std::{env, fmt, time::Duration};

use url::Url;

use crate::error::{GatewayError, Result};

/// CMS location used when `STRAPI_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1337";

const DEFAULT_TELEMETRY_TIMEOUT_MS: u64 = 2_000;
const API_PREFIX: &str = "/api";

/// Connection settings for the CMS, built once at startup.
#[derive(Clone)]
pub struct GatewayConfig {
    base_url: String,
    api_token: Option<String>,
    request_timeout: Option<Duration>,
    telemetry_timeout: Duration,
    proxy_url: Option<String>,
}

impl GatewayConfig {
    /// Settings for `base_url` with no token, no request timeout and the
    /// default telemetry timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            api_token: None,
            request_timeout: None,
            telemetry_timeout: Duration::from_millis(DEFAULT_TELEMETRY_TIMEOUT_MS),
            proxy_url: None,
        })
    }

    /// Read the settings from the process environment.
    ///
    /// | variable | meaning |
    /// |---|---|
    /// | `STRAPI_URL` | CMS base URL, defaults to [`DEFAULT_BASE_URL`] |
    /// | `STRAPI_TOKEN` | bearer token, optional |
    /// | `STRAPI_HTTP_TIMEOUT_SECONDS` | whole-request timeout, optional |
    /// | `STRAPI_TELEMETRY_TIMEOUT_MS` | detached telemetry timeout, default 2000 |
    /// | `STRAPI_PROXY_URL` | HTTP(S) proxy, optional |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`GatewayConfig::from_env`] with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let base_url = non_empty("STRAPI_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Some(token) = non_empty("STRAPI_TOKEN") {
            config = config.with_token(token);
        }
        if let Some(seconds) = non_empty("STRAPI_HTTP_TIMEOUT_SECONDS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|seconds| *seconds > 0)
        {
            config = config.with_request_timeout(Duration::from_secs(seconds));
        }
        if let Some(millis) = non_empty("STRAPI_TELEMETRY_TIMEOUT_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|millis| *millis > 0)
        {
            config = config.with_telemetry_timeout(Duration::from_millis(millis));
        }
        if let Some(proxy_url) = non_empty("STRAPI_PROXY_URL") {
            config = config.with_proxy(proxy_url);
        }

        Ok(config)
    }

    /// Send `Authorization: Bearer <token>`; a blank token disables the header.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.api_token = Some(token.trim().to_string()).filter(|token| !token.is_empty());
        self
    }

    /// Bound every CMS request by `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Bound detached telemetry posts by `timeout`.
    pub fn with_telemetry_timeout(mut self, timeout: Duration) -> Self {
        self.telemetry_timeout = timeout;
        self
    }

    /// Route CMS traffic through an HTTP(S) proxy.
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an API endpoint such as `/news`.
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, endpoint)
    }

    /// Configured bearer token.
    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    /// Whole-request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Timeout of detached telemetry posts.
    pub fn telemetry_timeout(&self) -> Duration {
        self.telemetry_timeout
    }

    /// Configured proxy.
    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .field("telemetry_timeout", &self.telemetry_timeout)
            .field("proxy_url", &self.proxy_url)
            .finish()
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|err| GatewayError::Config(format!("invalid CMS base URL `{raw}`: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(GatewayError::Config(format!(
            "CMS base URL `{raw}` must use http or https"
        )));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(GatewayError::Config(format!(
            "CMS base URL `{raw}` must not carry a query or fragment"
        )));
    }
    Ok(trimmed.to_string())
}
