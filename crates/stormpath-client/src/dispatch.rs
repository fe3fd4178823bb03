//! Authenticated request dispatch.
//!
//! Every request to the service goes through a [`Dispatcher`], which sets the
//! fixed headers, applies HTTP basic authentication and resolves relative
//! paths against the configured base address. It never retries and never
//! follows redirects.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, Response};
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use url::Url;

use stormpath_common::{ApiKeyPair, Config};

use crate::error::{ClientError, Result, ServiceErrorResponse};

const JSON: &str = "application/json";

/// Sends authenticated requests to the service.
#[derive(Clone)]
pub struct Dispatcher {
    client: ClientWithMiddleware,
    keypair: Arc<ApiKeyPair>,
    base_url: String,
    user_agent: String,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("keypair", &self.keypair)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher for the given credentials and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base address is not a valid URL or the HTTP
    /// client cannot be built.
    pub fn new(keypair: Arc<ApiKeyPair>, config: &Config) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| {
            ClientError::ConfigurationError(format!("Invalid base URL '{}': {e}", config.base_url))
        })?;

        // Tenant discovery inspects the 302 itself, so the transport must not follow it.
        let builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
        let reqwest_client = match config.timeout_seconds {
            Some(timeout) => builder.timeout(Duration::from_secs(timeout)).build()?,
            None => builder.build()?,
        };

        let client = reqwest_middleware::ClientBuilder::new(reqwest_client).build();

        Ok(Self {
            client,
            keypair,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// The base address relative paths are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a request target into an absolute URL.
    ///
    /// Targets starting with `/` are appended to the base address; anything
    /// else must already be absolute, such as a redirect `Location`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the result does not parse.
    pub fn resolve_url(&self, target: &str) -> Result<Url> {
        let url = if target.starts_with('/') {
            format!("{}{target}", self.base_url)
        } else {
            target.to_string()
        };

        Url::parse(&url).map_err(|e| ClientError::InvalidUrl(format!("'{url}': {e}")))
    }

    /// Send one request.
    ///
    /// `body`, when present, must already be JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid or the transport fails.
    /// Non-success statuses are not errors at this layer.
    pub async fn dispatch(
        &self,
        method: Method,
        target: &str,
        body: Option<String>,
    ) -> Result<Response> {
        self.dispatch_with_query(method, target, &[], body).await
    }

    /// Send one request with extra query parameters appended to the target.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::dispatch`].
    pub async fn dispatch_with_query(
        &self,
        method: Method,
        target: &str,
        query: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<Response> {
        let mut url = self.resolve_url(target)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        debug!("{method} {url}");

        let (id, secret) = self.keypair.basic_auth();
        let mut request_builder = self
            .client
            .request(method, url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, JSON)
            .basic_auth(id, Some(secret));

        if let Some(body) = body {
            request_builder = request_builder.header(CONTENT_TYPE, JSON).body(body);
        }

        let response = request_builder.send().await?;
        debug!("Response status {}", response.status().as_u16());

        Ok(response)
    }
}

/// Decode a JSON response body.
///
/// Every non-success response is an error: a structured error payload
/// becomes [`ClientError::ServiceError`], anything else
/// [`ClientError::HttpStatus`]. A success body that fails to decode as `T`
/// is returned as a decode error unchanged.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let error = match serde_json::from_slice::<ServiceErrorResponse>(&body) {
            Ok(payload) if !payload.developer_message.is_empty() || !payload.message.is_empty() => {
                ClientError::from_service_response(status.as_u16(), payload)
            }
            _ => {
                warn!("Unstructured error response with status {}", status.as_u16());
                ClientError::HttpStatus {
                    status: status.as_u16(),
                }
            }
        };
        error!("Request failed with status {}: {error}", status.as_u16());
        return Err(error);
    }

    Ok(serde_json::from_slice(&body)?)
}
