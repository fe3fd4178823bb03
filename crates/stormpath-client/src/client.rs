//! The Stormpath client facade.
//!
//! [`Client`] ties the credentials, the dispatcher and the resolved tenant
//! together and exposes typed operations on top of them.
//!
//! # Examples
//!
//! ```no_run
//! use stormpath_client::{Client, CreateDirectory};
//! use stormpath_common::Application;
//!
//! # async fn example() -> stormpath_client::Result<()> {
//! // Reads STORMPATH_API_KEY_ID and STORMPATH_API_KEY_SECRET.
//! let client = Client::from_env().await?;
//!
//! println!("Tenant: {}", client.tenant().name);
//!
//! for app in client.list_applications().await? {
//!     println!("{} ({})", app.name, app.status);
//! }
//!
//! let app = Application::builder().name("my-new-app").build();
//! let created = client.create_application(&app, CreateDirectory::Yes).await?;
//! println!("Created {}", created.href);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use futures::stream::{Stream, TryStreamExt};
use log::{debug, error, info};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;

use stormpath_common::{
    ApiKeyPair, Application, CollectionPage, Config, Directory, Tenant, TenantScoped,
};

use crate::dispatch::{Dispatcher, decode_json};
use crate::error::{ClientError, Result, ServiceErrorResponse};
use crate::{pagination, tenant};

/// Whether the service should create a directory alongside a new application.
///
/// The value is forwarded to the service as the `createDirectory` query
/// parameter and has no other effect on the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CreateDirectory {
    /// Create only the application.
    #[default]
    No,
    /// Create a directory with a service-chosen name and map it to the application.
    Yes,
    /// Create a directory with the given name and map it to the application.
    Named(String),
}

impl CreateDirectory {
    fn query_value(&self) -> Option<&str> {
        match self {
            Self::No => None,
            Self::Yes => Some("true"),
            Self::Named(name) => Some(name),
        }
    }
}

impl From<bool> for CreateDirectory {
    fn from(create: bool) -> Self {
        if create { Self::Yes } else { Self::No }
    }
}

/// Client for the Stormpath API, bound to the caller's tenant.
///
/// The tenant is resolved once when the client is created and shared with
/// every resource the client returns. All state is immutable after
/// construction, so a `Client` can be cloned and used from many tasks at once.
#[derive(Clone)]
pub struct Client {
    keypair: Arc<ApiKeyPair>,
    dispatcher: Dispatcher,
    tenant: Arc<Tenant>,
    config: Arc<Config>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("keypair", &self.keypair)
            .field("tenant", &self.tenant)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client and resolve the caller's tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or tenant resolution
    /// fails; no client is created in that case.
    pub async fn new(keypair: ApiKeyPair, config: Config) -> Result<Self> {
        let keypair = Arc::new(keypair);
        let dispatcher = Dispatcher::new(Arc::clone(&keypair), &config)?;
        let tenant = tenant::resolve_tenant(&dispatcher).await?;

        info!("Resolved tenant {} ({})", tenant.name, tenant.href);

        Ok(Self {
            keypair,
            dispatcher,
            tenant: Arc::new(tenant),
            config: Arc::new(config),
        })
    }

    /// Create a client from `STORMPATH_API_KEY_ID` / `STORMPATH_API_KEY_SECRET`
    /// with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if either variable is
    /// missing, or any error from [`Client::new`].
    pub async fn from_env() -> Result<Self> {
        let keypair = ApiKeyPair::from_env()
            .map_err(|e| ClientError::ConfigurationError(e.to_string()))?;
        Self::new(keypair, Config::default()).await
    }

    /// The tenant resolved when this client was created.
    #[must_use]
    pub fn tenant(&self) -> &Arc<Tenant> {
        &self.tenant
    }

    /// The configuration this client was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The credentials this client authenticates with.
    #[must_use]
    pub fn keypair(&self) -> &ApiKeyPair {
        &self.keypair
    }

    /// Send a raw authenticated request.
    ///
    /// `target` may be a path relative to the base address (starting with
    /// `/`) or an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid or the transport fails.
    pub async fn request(
        &self,
        method: Method,
        target: &str,
        body: Option<String>,
    ) -> Result<Response> {
        self.dispatcher.dispatch(method, target, body).await
    }

    /// Resolve the caller's tenant again.
    ///
    /// This does not replace the tenant cached by the client.
    ///
    /// # Errors
    ///
    /// Same as [`tenant::resolve_tenant`].
    pub async fn get_tenant(&self) -> Result<Tenant> {
        tenant::resolve_tenant(&self.dispatcher).await
    }

    /// List every application in the tenant.
    ///
    /// Pages through the whole collection before returning.
    ///
    /// # Errors
    ///
    /// Any failure on any page aborts the listing.
    pub async fn list_applications(&self) -> Result<Vec<Application>> {
        self.list_scoped(&self.tenant.applications_href()).await
    }

    /// List every directory in the tenant.
    ///
    /// # Errors
    ///
    /// Any failure on any page aborts the listing.
    pub async fn list_directories(&self) -> Result<Vec<Directory>> {
        self.list_scoped(&self.tenant.directories_href()).await
    }

    /// Stream the tenant's applications one page at a time.
    pub fn application_pages(
        &self,
    ) -> impl Stream<Item = Result<CollectionPage<Application>>> + '_ {
        self.scoped_pages(self.tenant.applications_href())
    }

    /// Stream the tenant's directories one page at a time.
    pub fn directory_pages(&self) -> impl Stream<Item = Result<CollectionPage<Directory>>> + '_ {
        self.scoped_pages(self.tenant.directories_href())
    }

    /// Create an application in the tenant.
    ///
    /// # Errors
    ///
    /// - [`ClientError::ServiceError`] if the service answers with anything
    ///   other than 201 and a structured error body
    /// - [`ClientError::SerializationError`] if either body fails to encode or decode
    /// - transport errors unchanged
    pub async fn create_application(
        &self,
        application: &Application,
        create_directory: impl Into<CreateDirectory>,
    ) -> Result<Application> {
        let body = serde_json::to_string(application)?;
        let create_directory = create_directory.into();
        let query: Vec<(&str, &str)> = create_directory
            .query_value()
            .map(|value| ("createDirectory", value))
            .into_iter()
            .collect();

        let response = self
            .dispatcher
            .dispatch_with_query(
                Method::POST,
                &self.tenant.applications_href(),
                &query,
                Some(body),
            )
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.bytes().await?;
            let payload: ServiceErrorResponse = serde_json::from_slice(&body)?;
            let error = ClientError::from_service_response(status.as_u16(), payload);
            error!("Application creation failed: {error}");
            return Err(error);
        }

        let mut created: Application = decode_json(response).await?;
        created.attach_tenant(Arc::clone(&self.tenant));
        debug!("Created application {}", created.href);

        Ok(created)
    }

    async fn list_scoped<T>(&self, collection_href: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + TenantScoped,
    {
        let mut items: Vec<T> = pagination::fetch_all(&self.dispatcher, collection_href).await?;
        for item in &mut items {
            item.attach_tenant(Arc::clone(&self.tenant));
        }

        debug!("Listed {} items from {collection_href}", items.len());
        Ok(items)
    }

    fn scoped_pages<T>(
        &self,
        collection_href: String,
    ) -> impl Stream<Item = Result<CollectionPage<T>>> + '_
    where
        T: DeserializeOwned + TenantScoped + 'static,
    {
        let tenant = Arc::clone(&self.tenant);
        pagination::pages(&self.dispatcher, collection_href).map_ok(move |mut page: CollectionPage<T>| {
            for item in &mut page.items {
                item.attach_tenant(Arc::clone(&tenant));
            }
            page
        })
    }
}
