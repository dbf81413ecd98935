//! Embeddable HTTP(S) static-resource server library.

pub mod config;
pub mod error;
pub mod http;
pub mod net;
pub mod stream;

pub use config::ServerConfig;
pub use error::ServeError;
pub use http::{EmbeddedResource, ResourceHandler, ResourceServer};
