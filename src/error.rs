//! Error taxonomy shared across the crate.
//!
//! # Design Decisions
//! - One enum for the whole serving core; callers match on the category,
//!   never on the underlying cause.
//! - Key-store and TLS failures are collapsed into `AccessDenied` carrying
//!   the absolute store path, intended for startup-time diagnosis.
//! - Resource-level failures are mapped to HTTP statuses inside the handler
//!   and never cross the handler boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for the resource-serving core.
#[derive(Debug, Error)]
pub enum ServeError {
    /// A caller passed an argument that can never be valid (zero buffer
    /// size, unparseable socket address or method token). Never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A named resource does not exist or is not of the required kind
    /// (missing key-store file, missing resource root).
    #[error("no such resource: {}", path.display())]
    NoSuchResource { path: PathBuf },

    /// The key-store could not be trusted: unreadable, corrupt, wrong
    /// passphrase, or rejected key material. The original cause is kept,
    /// but callers should not need to distinguish the failure mode.
    #[error("access denied: {}", path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other I/O problem, propagated unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
