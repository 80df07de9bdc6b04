// src/utils/config.rs
use log::info;
use std::net::SocketAddr;

use crate::utils::env::env_or;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 7860;
pub const DEFAULT_MODEL_PATH: &str = "models/juice_model.json";
pub const DEFAULT_API_URL: &str = "http://localhost:7860";

/// Configuration for the prediction API server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Path of the model artifact loaded at startup
    pub model_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: DEFAULT_MODEL_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create server configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env_or("JUICE_API_HOST", DEFAULT_HOST.to_string()),
            port: env_or("JUICE_API_PORT", DEFAULT_PORT),
            model_path: env_or("JUICE_MODEL_PATH", DEFAULT_MODEL_PATH.to_string()),
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("Invalid listen address '{}': {}", addr, e))
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        info!("⚙️  Server configuration");
        info!("   Listen address: {}:{}", self.host, self.port);
        info!("   Model artifact: {}", self.model_path);
    }
}

/// Base URL the client talks to, from `JUICE_API_URL`.
pub fn api_url_from_env() -> String {
    env_or("JUICE_API_URL", DEFAULT_API_URL.to_string())
}
