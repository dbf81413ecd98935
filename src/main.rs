//! resource-server
//!
//! A static-resource HTTP(S) server built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               RESOURCE SERVER                 │
//!                    │                                               │
//!   Client Request   │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│   net   │──▶│   http   │──▶│  handler  │  │
//!                    │  │ tls/addr│   │  server  │   │ dispatch  │  │
//!                    │  └─────────┘   └──────────┘   └─────┬─────┘  │
//!                    │                                     │        │
//!   Client Response  │              ┌──────────┐     ┌─────▼─────┐  │
//!   ◀────────────────┼──────────────│  stream  │◀────│ resource  │  │
//!                    │              │   copy   │     │resolution │  │
//!                    │              └──────────┘     └───────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use axum::http::Method;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resource_server::config::load_config;
use resource_server::net::socket_address;
use resource_server::{ResourceHandler, ResourceServer};

#[derive(Debug, Parser)]
#[command(name = "resource-server", about = "HTTP(S) static-resource server")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "server.toml")]
    config: PathBuf,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resource_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::info!(config = %cli.config.display(), "resource-server starting");

    let config = load_config(&cli.config)?;
    let bind_address = cli
        .bind
        .as_deref()
        .unwrap_or(&config.listener.bind_address);
    let address = socket_address(bind_address)?;

    let root = config
        .site
        .resource_root
        .as_ref()
        .ok_or("site.resource_root is required")?;
    let handler = ResourceHandler::for_directory(&config.site.context_path, root)?;

    for token in &config.site.allowed_methods {
        let method = Method::from_bytes(token.as_bytes())?;
        handler.allowed_methods().insert(method);
    }
    for (extension, content_type) in &config.site.content_types {
        handler
            .content_types()
            .insert(extension.to_ascii_lowercase(), content_type.clone());
    }

    tracing::info!(
        context_path = handler.context_path(),
        resource_root = %root.display(),
        "Configuration loaded"
    );

    let (key_store, passphrase) = match &config.listener.tls {
        Some(tls) => (Some(tls.key_store.as_path()), tls.passphrase.as_deref()),
        None => (None, None),
    };
    let server = match ResourceServer::bind(address, key_store, passphrase) {
        Ok(server) => server,
        Err(error) => {
            tracing::error!(%error, "key-store rejected, aborting startup");
            return Err(error.into());
        }
    };

    let router = handler.router().layer(TraceLayer::new_for_http());
    server.serve(router).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
