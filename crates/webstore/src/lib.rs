//! Chrome Web Store publishing for Nano extensions.
//!
//! [`WebStorePublisher`] exchanges the stored OAuth refresh token for an
//! access token, uploads a packaged extension and requests its publication.
//! All HTTP traffic goes through an [`HttpExecutor`](http::HttpExecutor) so
//! the flow can be driven without a network.

pub mod api;
pub mod credentials;
pub mod error;
pub mod http;
pub mod publisher;

pub use api::{PublishStatus, PublishTarget, WebStoreEndpoints};
pub use credentials::Credentials;
pub use error::{PublishError, PublishStep, Result, TransportError};
pub use publisher::{PACKAGE_EXTENSION, PublishReport, WebStorePublisher, validate_package};
