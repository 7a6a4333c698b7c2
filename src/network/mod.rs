//! HTTP networking module
//!
//! Provides the query client used by the translation API to reach remote endpoints.

mod client;
mod escape;
mod response;
mod user_agent;

pub use client::QueryClient;
pub use escape::{escape, unescape};
pub use response::{status_description, QueryResponse, STATUS_OK};
pub use user_agent::{generate_user_agent, DEFAULT_USER_AGENT};
