//! Internal HTTP client that authenticates with an API token and unwraps API envelopes.

use crate::core::domain::{
    error::{ProxmoxError, ProxmoxResult},
    model::{client_config::ClientConfig, proxmox_connection::ProxmoxConnection},
};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, Method, StatusCode, header::AUTHORIZATION};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// Every Proxmox VE response wraps its payload in `{"data": ...}`.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: T,
}

/// Internal HTTP client that provides methods to call the Proxmox API.
///
/// This client adds the `Authorization: PVEAPIToken=...` header to each request,
/// applies the optional client-side rate limit and returns the `data` member of
/// the response envelope.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: Arc<ProxmoxConnection>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// TLS verification follows the connection's own setting; no process-wide
    /// state is touched.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Transport` if the HTTP client cannot be built.
    pub fn new(connection: ProxmoxConnection, config: &ClientConfig) -> ProxmoxResult<Self> {
        let http_client = Client::builder()
            .danger_accept_invalid_certs(!connection.verify_tls())
            .build()
            .map_err(|source| ProxmoxError::Transport {
                context: "building the HTTP client".to_string(),
                source,
            })?;

        let rate_limiter = config.rate_limit.map(|rl| {
            let rate = NonZeroU32::new(rl.requests_per_second).unwrap_or(NonZeroU32::MIN);
            let burst = NonZeroU32::new(rl.burst_size).unwrap_or(NonZeroU32::MIN);
            Arc::new(DefaultDirectRateLimiter::direct(
                Quota::per_second(rate).allow_burst(burst),
            ))
        });

        Ok(Self {
            http_client,
            connection: Arc::new(connection),
            rate_limiter,
        })
    }

    /// Returns a reference to the underlying connection details.
    pub fn connection(&self) -> &ProxmoxConnection {
        &self.connection
    }

    /// Performs an authenticated GET request.
    ///
    /// # Errors
    /// Returns `ProxmoxError` if the request fails or the response cannot be parsed.
    pub async fn get<T>(&self, path: &str) -> ProxmoxResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.execute_request(Method::GET, path, None::<&()>).await
    }

    /// Performs an authenticated POST request with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ProxmoxResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        self.execute_request(Method::POST, path, Some(body)).await
    }

    /// Performs an authenticated PUT request with a JSON body.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ProxmoxResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        self.execute_request(Method::PUT, path, Some(body)).await
    }

    /// Performs an authenticated DELETE request.
    pub async fn delete<T>(&self, path: &str) -> ProxmoxResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.execute_request(Method::DELETE, path, None::<&()>)
            .await
    }

    /// Core request execution method: rate limit, send, map the status, unwrap `data`.
    async fn execute_request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ProxmoxResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self.connection.url().api_url(path);
        debug!(%method, %url, "Proxmox API request");

        let mut req_builder = self
            .http_client
            .request(method.clone(), &url)
            .header(AUTHORIZATION, self.connection.authorization_header());

        if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|source| ProxmoxError::Transport {
                context: format!("sending {} {}", method, path),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProxmoxError::Authentication(format!(
                "API token rejected ({}) for {} {}",
                status, method, path
            )));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(ProxmoxError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<ApiResponse<T>>()
            .await
            .map(|envelope| envelope.data)
            .map_err(|source| ProxmoxError::Transport {
                context: format!("parsing the response of {} {}", method, path),
                source,
            })
    }
}
