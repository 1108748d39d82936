//! Server configuration from environment variables.

use std::net::SocketAddr;

use crate::error::{ApiError, ApiResult};

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_host: String,
    pub port: u16,
    /// Upstream API credential. Empty until the admin configures one.
    pub api_key: String,
    /// Zone queried for visitors whose IP cannot be geolocated.
    pub fallback_zone: String,
}

impl ApiConfig {
    pub fn from_env() -> ApiResult<Self> {
        let bind_host =
            std::env::var("GRIDAWARE_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_str = std::env::var("PORT")
            .ok()
            .or_else(|| std::env::var("GRIDAWARE_API_PORT").ok())
            .unwrap_or_else(|| "3000".to_string());
        let port = port_str
            .parse::<u16>()
            .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

        Ok(Self {
            bind_host,
            port,
            api_key: std::env::var("GRIDAWARE_API_KEY").unwrap_or_default(),
            fallback_zone: std::env::var("GRIDAWARE_FALLBACK_ZONE")
                .unwrap_or_else(|_| "ES".to_string()),
        })
    }

    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr_formats() {
        let config = ApiConfig {
            bind_host: "127.0.0.1".to_string(),
            port: 8080,
            api_key: String::new(),
            fallback_zone: "ES".to_string(),
        };
        assert_eq!(
            config.bind_addr().unwrap(),
            "127.0.0.1:8080".parse().unwrap()
        );
    }
}
