use std::{env, net::SocketAddr};

use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_ARCHIVE_API_URL: &str = "http://localhost:3000/api/conversation";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub archive_api_url: Url,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("ARCHIVE_API_URL must be an absolute http(s) URL")]
    InvalidArchiveUrl,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let bind_port = env::var("BIND_PORT")
            .ok()
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8000);
        let archive_api_url = env::var("ARCHIVE_API_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_API_URL.to_string())
            .parse::<Url>()
            .map_err(|_| ConfigError::InvalidArchiveUrl)?;

        if !matches!(archive_api_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidArchiveUrl);
        }

        let config = Self {
            bind_addr,
            bind_port,
            archive_api_url,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
