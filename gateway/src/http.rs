use bytes::Bytes;
use reqwest::{header, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::GatewayConfig,
    error::{GatewayError, Result},
    query::CmsQuery,
};

const ERROR_BODY_LIMIT: usize = 512;

/// Shared transport: one connection pool, one base URL, one token.
#[derive(Debug)]
pub(crate) struct CmsHttp {
    client: Client,
    config: GatewayConfig,
}

impl CmsHttp {
    pub(crate) fn new(config: GatewayConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy_url) = config.proxy_url() {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|err| {
                GatewayError::Config(format!("invalid proxy URL `{proxy_url}`: {err}"))
            })?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|err| GatewayError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            config,
        })
    }

    pub(crate) fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub(crate) async fn get_json<T>(&self, endpoint: &str, query: Option<&CmsQuery>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut url = self.config.api_url(endpoint);
        if let Some(query) = query.filter(|query| !query.is_empty()) {
            url.push('?');
            url.push_str(&query.to_query_string());
        }
        tracing::debug!(method = "GET", %url, "cms request");

        let body = self.execute(endpoint, self.client.get(url)).await?;
        decode(endpoint, &body)
    }

    pub(crate) async fn post_json<B, T>(&self, endpoint: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.post(endpoint, payload).await?;
        decode(endpoint, &body)
    }

    /// POST where only the outcome matters; the response body is ignored.
    pub(crate) async fn post_discard<B>(&self, endpoint: &str, payload: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.post(endpoint, payload).await.map(|_| ())
    }

    async fn post<B>(&self, endpoint: &str, payload: &B) -> Result<Bytes>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.api_url(endpoint);
        tracing::debug!(method = "POST", %url, "cms request");
        self.execute(endpoint, self.client.post(url).json(payload))
            .await
    }

    async fn execute(&self, endpoint: &str, request: RequestBuilder) -> Result<Bytes> {
        let mut request = request.header(header::ACCEPT, "application/json");
        if let Some(token) = self.config.api_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(endpoint, %status, "cms rejected request");
            return Err(GatewayError::Status {
                endpoint: endpoint.to_string(),
                status,
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|source| GatewayError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| GatewayError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
