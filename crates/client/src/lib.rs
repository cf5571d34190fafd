//! CloudDeck API client
//!
//! Typed REST client for the CloudDeck backend, plus the polling watcher
//! used for status refresh. All calls carry the bearer token from an
//! explicit [`ApiContext`]; there is no global auth state.

mod client;
mod context;
mod poller;

pub use client::ApiClient;
pub use context::ApiContext;
pub use poller::ResourceWatcher;
