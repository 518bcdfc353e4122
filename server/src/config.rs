//! Server configuration.

use dramex_rates::fetcher::UPSTREAM_URL;

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Upstream rate page URL.
    pub upstream_url: String,
    /// Production mode; controls the `Secure` flag on issued cookies.
    pub production: bool,
    /// Log level.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 3000,
            upstream_url: UPSTREAM_URL.to_string(),
            production: false,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("SERVER_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(port) = std::env::var("SERVER_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Ok(url) = std::env::var("RATES_UPSTREAM_URL") {
            config.upstream_url = url;
        }

        if let Ok(env) = std::env::var("APP_ENV") {
            config.production = env == "production";
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if !self.upstream_url.starts_with("http") {
            return Err("Upstream URL must be an http(s) endpoint".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.production);
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServerConfig::default();
        config.listen_port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_upstream_url() {
        let mut config = ServerConfig::default();
        config.upstream_url = "ftp://example.org".to_string();
        assert!(config.validate().is_err());
    }
}
