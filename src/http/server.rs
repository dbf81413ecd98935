//! HTTP(S) server setup.
//!
//! # Responsibilities
//! - Turn a bind address plus optional key-store into a listening transport
//! - Bind plain HTTP when no key-store is given, HTTPS otherwise
//! - Hand accepted exchanges to the resource handler's router
//!
//! Worker scheduling, connection timeouts, and exchange teardown belong to
//! the underlying transport (tokio/hyper via axum-server), not this crate.

use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;

use crate::error::ServeError;
use crate::net::tls;

/// A listening transport, plain or TLS-wrapped, ready to serve a router.
pub struct ResourceServer {
    address: SocketAddr,
    tls: Option<RustlsConfig>,
}

impl ResourceServer {
    /// Prepares a server for the given address. With a key-store path the
    /// transport is HTTPS using a context built per [`tls::server_config`];
    /// without one it is plain HTTP with the platform-default backlog.
    ///
    /// Key-store problems surface here, before any socket is opened, so
    /// operators see them at startup rather than per request.
    pub fn bind(
        address: SocketAddr,
        key_store_path: Option<&Path>,
        passphrase: Option<&str>,
    ) -> Result<Self, ServeError> {
        let tls = tls::server_config(key_store_path, passphrase)?.map(RustlsConfig::from_config);
        tracing::info!(
            %address,
            tls = tls.is_some(),
            "transport prepared"
        );
        Ok(Self { address, tls })
    }

    /// The address this server will bind.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Whether the transport negotiates TLS.
    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Runs the accept loop, dispatching every exchange to the router.
    pub async fn serve(self, router: Router) -> Result<(), std::io::Error> {
        let service = router.into_make_service();
        match self.tls {
            Some(config) => {
                tracing::info!(address = %self.address, "HTTPS server starting");
                axum_server::bind_rustls(self.address, config)
                    .serve(service)
                    .await
            }
            None => {
                tracing::info!(address = %self.address, "HTTP server starting");
                axum_server::bind(self.address).serve(service).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_transport_without_key_store() {
        let address = "127.0.0.1:0".parse().unwrap();
        let server = ResourceServer::bind(address, None, None).unwrap();
        assert!(!server.is_tls());
        assert_eq!(server.address(), address);
    }

    #[test]
    fn key_store_problems_surface_at_bind_time() {
        let address = "127.0.0.1:0".parse().unwrap();
        let missing = Path::new("/nowhere/keystore.pem");
        let result = ResourceServer::bind(address, Some(missing), None);
        assert!(matches!(result, Err(ServeError::NoSuchResource { .. })));
    }
}
