//! # stormpath-common
//!
//! Shared types for talking to the Stormpath identity-management API.
//!
//! This crate holds everything that crosses the wire or configures a client:
//! - The API key pair used to authenticate every request
//! - Client configuration (base address, user agent, timeouts)
//! - Tenant, application and directory resources
//! - The paginated collection envelope returned by list endpoints
//! - Plain data shapes for accounts, groups and custom data
//!
//! ## Example
//!
//! ```
//! use stormpath_common::{Application, ApiKeyPair, Config, ResourceStatus};
//!
//! let keypair = ApiKeyPair::new("key-id", "key-secret");
//! let config = Config::default().with_timeout(30);
//!
//! let app = Application::builder()
//!     .name("my-app")
//!     .description("Created from Rust")
//!     .status(ResourceStatus::Enabled)
//!     .build();
//!
//! assert_eq!(keypair.id(), "key-id");
//! assert_eq!(config.base_url, "https://api.stormpath.com/v1");
//! assert!(app.href.is_empty());
//! ```

/// Paginated collection envelope.
pub mod collection;
/// Client configuration.
pub mod config;
/// API key credentials.
pub mod credentials;
/// Tenant-scoped resources and auxiliary data shapes.
pub mod resources;

pub use collection::CollectionPage;
pub use config::{Config, DEFAULT_BASE_URL, USER_AGENT};
pub use credentials::{API_KEY_ID_ENV, API_KEY_SECRET_ENV, ApiKeyPair};
pub use resources::{
    Account, Application, CustomData, Directory, Group, GroupMembership, Link, ResourceStatus,
    Tenant, TenantScoped,
};
