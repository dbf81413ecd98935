//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::net::socket_address;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Semantic checks beyond what serde enforces.
fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
    socket_address(&config.listener.bind_address)
        .map_err(|error| ConfigError::Validation(error.to_string()))?;

    let Some(root) = &config.site.resource_root else {
        return Err(ConfigError::Validation(
            "site.resource_root is required".to_string(),
        ));
    };
    if !root.is_dir() {
        return Err(ConfigError::Validation(format!(
            "site.resource_root {} is not a directory",
            root.display()
        )));
    }

    for token in &config.site.allowed_methods {
        Method::from_bytes(token.as_bytes()).map_err(|_| {
            ConfigError::Validation(format!("malformed method token {token:?}"))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("config-{}-{}.toml", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn minimal_config_loads() {
        let root = std::env::temp_dir();
        let path = write_config(
            "minimal",
            &format!(
                "[site]\ncontext_path = \"/static/\"\nresource_root = {:?}\n",
                root
            ),
        );
        let config = load_config(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.site.context_path, "/static/");
    }

    #[test]
    fn missing_resource_root_is_rejected() {
        let path = write_config("noroot", "[site]\ncontext_path = \"/\"\n");
        let result = load_config(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn malformed_method_tokens_are_rejected() {
        let root = std::env::temp_dir();
        let path = write_config(
            "badmethod",
            &format!(
                "[site]\nresource_root = {:?}\nallowed_methods = [\"GE T\"]\n",
                root
            ),
        );
        let result = load_config(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        let root = std::env::temp_dir();
        let path = write_config(
            "badbind",
            &format!(
                "[listener]\nbind_address = \"nope\"\n[site]\nresource_root = {:?}\n",
                root
            ),
        );
        let result = load_config(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
