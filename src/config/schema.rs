//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults so a minimal file works.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the resource server binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Site configuration (context path, resource root, type overrides).
    pub site: SiteConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration; absent means plain HTTP.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to the key-store bundle (PEM: certificate chain + private key).
    pub key_store: PathBuf,

    /// Passphrase for an encrypted private key; defaults to "changeit".
    #[serde(default)]
    pub passphrase: Option<String>,
}

/// Site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// URL prefix this server claims (normalized to leading and trailing
    /// slashes at handler construction).
    pub context_path: String,

    /// Directory resources are resolved against. Required by the binary.
    pub resource_root: Option<PathBuf>,

    /// Additional methods to advertise via OPTIONS, e.g. ["HEAD"].
    /// Advertised methods still answer 405 unless a handler is registered.
    pub allowed_methods: Vec<String>,

    /// Extension → MIME type overrides layered on the builtin table.
    pub content_types: HashMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            context_path: "/".to_string(),
            resource_root: None,
            allowed_methods: Vec::new(),
            content_types: HashMap::new(),
        }
    }
}
