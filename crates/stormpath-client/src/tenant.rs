//! Tenant discovery.
//!
//! The service only exposes the caller's tenant through a stable alias that
//! redirects to the tenant's canonical address. Resolution follows that
//! redirect by hand: one request to the alias, one to the `Location` it
//! points at.

use log::debug;
use reqwest::header::LOCATION;
use reqwest::{Method, StatusCode};

use stormpath_common::Tenant;

use crate::dispatch::{Dispatcher, decode_json};
use crate::error::{ClientError, Result};

/// Well-known alias of the authenticated caller's tenant.
pub const CURRENT_TENANT_PATH: &str = "/tenants/current";

/// Resolve the tenant that owns the dispatcher's credentials.
///
/// # Errors
///
/// - [`ClientError::UnexpectedStatus`] if the alias does not answer with 302
/// - [`ClientError::MissingRedirect`] if the 302 has no `Location` header
/// - [`ClientError::ServiceError`] or [`ClientError::HttpStatus`] if the
///   tenant itself answers with a failure status
/// - transport and decode errors from either request, unchanged
pub async fn resolve_tenant(dispatcher: &Dispatcher) -> Result<Tenant> {
    let response = dispatcher
        .dispatch(Method::GET, CURRENT_TENANT_PATH, None)
        .await?;

    let status = response.status();
    if status != StatusCode::FOUND {
        return Err(ClientError::UnexpectedStatus {
            expected: StatusCode::FOUND.as_u16(),
            actual: status.as_u16(),
        });
    }

    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(ClientError::MissingRedirect)?
        .to_string();

    debug!("Current tenant redirects to {location}");

    let response = dispatcher.dispatch(Method::GET, &location, None).await?;
    decode_json(response).await
}
