//! # stormpath-client
//!
//! Client library for the Stormpath identity-management API.
//!
//! The crate is layered the same way a request flows:
//! - [`dispatch`]: authenticated, redirect-free HTTP requests
//! - [`tenant`]: discovery of the caller's tenant through its redirect alias
//! - [`pagination`]: offset/limit paging over collections, eager or lazy
//! - [`client`]: the [`Client`] facade composing the above
//!
//! Nothing is retried. Every error is terminal for the operation that
//! produced it, and collection listings are all or nothing.
//!
//! ## Example
//!
//! ```no_run
//! use stormpath_client::Client;
//! use stormpath_common::{ApiKeyPair, Config};
//!
//! # async fn example() -> stormpath_client::Result<()> {
//! let keypair = ApiKeyPair::new("key-id", "key-secret");
//! let client = Client::new(keypair, Config::default().with_timeout(30)).await?;
//!
//! for directory in client.list_directories().await? {
//!     println!("{}: {}", directory.name, directory.href);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod dispatch;
pub mod error;
pub mod pagination;
pub mod tenant;

pub use client::{Client, CreateDirectory};
pub use dispatch::Dispatcher;
pub use error::{ClientError, Result, ServiceErrorResponse};
