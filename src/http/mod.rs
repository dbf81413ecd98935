//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (plain or TLS listening transport)
//!     → handler.rs (context check, method dispatch, resolution)
//!     → stream.rs (resource bytes → response body)
//!     → Send to client
//! ```

pub mod content_types;
pub mod handler;
pub mod server;

pub use handler::{EmbeddedResource, ResourceHandler};
pub use server::ResourceServer;
