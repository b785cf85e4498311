//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Serialized classifier (ONNX)
    pub model_path: String,

    /// Directory served as static assets
    pub static_root: String,

    /// URL prefix for static assets
    pub static_url: String,

    /// Environment (development, production)
    pub environment: String,

    /// Log format (pretty, json)
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: env::var("MODEL_PATH")
                .unwrap_or(defaults.model_path),

            static_root: env::var("STATIC_ROOT")
                .unwrap_or(defaults.static_root),

            static_url: env::var("STATIC_URL")
                .ok()
                .map(|u| normalize_prefix(&u))
                .filter(|u| u != "/")
                .unwrap_or(defaults.static_url),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),

            log_format: env::var("LOG_FORMAT")
                .unwrap_or(defaults.log_format),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            model_path: "prediction/model_gbc.onnx".to_string(),
            static_root: "static".to_string(),
            static_url: "/static".to_string(),
            environment: "development".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// `static/` and `/static/` both become `/static`
fn normalize_prefix(prefix: &str) -> String {
    format!("/{}", prefix.trim().trim_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.model_path, "prediction/model_gbc.onnx");
        assert_eq!(config.addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.environment, "development");
        assert!(!config.json_logs());
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("static/"), "/static");
        assert_eq!(normalize_prefix("/assets/"), "/assets");
        assert_eq!(normalize_prefix("/"), "/");
    }
}
