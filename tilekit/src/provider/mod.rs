//! Tile provider abstraction
//!
//! A [`Provider`] describes where tiles come from: a URL template, a row
//! convention, an attribution string and an optional set of load-balancer
//! hosts. Fetching goes through the [`AsyncHttpClient`] trait so the fetch
//! pipeline can be driven by a mock in tests.
//!
//! ```ignore
//! use tilekit::provider::{ProviderCatalog, ReqwestClient};
//!
//! let catalog = ProviderCatalog::builtin();
//! let osm = catalog.get("osm").unwrap();
//! let client = ReqwestClient::new()?;
//! ```

mod catalog;
mod http;
mod types;

pub use catalog::ProviderCatalog;
pub use http::{AsyncHttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use types::{Provider, ProviderError, TilingScheme};

#[cfg(test)]
pub use http::tests::MockHttpClient;
