//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! "host:port" string
//!     → socket_address (resolve to a bind endpoint)
//!     → tls.rs (optional key-store → rustls server context)
//!     → http::server (plain or TLS listening transport)
//! ```

pub mod tls;

use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::ServeError;

/// Resolves a `host:port` string into a socket address.
///
/// Accepts anything the platform resolver accepts ("127.0.0.1:8080",
/// "localhost:443", "[::1]:80"); the first resolved address wins. Input
/// that resolves to nothing fails with [`ServeError::InvalidArgument`].
pub fn socket_address(text: &str) -> Result<SocketAddr, ServeError> {
    text.to_socket_addrs()
        .map_err(|error| {
            ServeError::InvalidArgument(format!("bad socket address {text:?}: {error}"))
        })?
        .next()
        .ok_or_else(|| {
            ServeError::InvalidArgument(format!("socket address {text:?} resolves to nothing"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_addresses() {
        let address = socket_address("127.0.0.1:8080").unwrap();
        assert_eq!(address.port(), 8080);
        assert!(address.ip().is_loopback());
    }

    #[test]
    fn parses_bracketed_ipv6() {
        let address = socket_address("[::1]:80").unwrap();
        assert_eq!(address.port(), 80);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            socket_address("not an address"),
            Err(ServeError::InvalidArgument(_))
        ));
        assert!(matches!(
            socket_address(""),
            Err(ServeError::InvalidArgument(_))
        ));
    }
}
