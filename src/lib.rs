//! netquery: network query helper for the translation API client
//!
//! Issues single GET requests with a configurable timeout and user agent and
//! reports the body, a status description and any captured fault.

pub mod config;
pub mod error;
pub mod network;

pub use config::NetworkSettings;
pub use error::{ConfigError, QueryError};
pub use network::{QueryClient, QueryResponse};
pub use tokio_util::sync::CancellationToken;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
