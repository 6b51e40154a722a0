//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

/// Configuration for creating the HTTP server over a shared entity store.
pub struct ServerConfig<S> {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Arc<S>,
}

impl<S> ServerConfig<S> {
    /// Bind `bind_addr` and serve the API over `store`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, store: Arc<S>) -> Self {
        Self { bind_addr, store }
    }
}
