use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    MissingRequiredEnvVar(String),
    InvalidUrl(String),
    InvalidNumber(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigError::MissingRequiredEnvVar(var) => write!(f, "Required environment variable {} is missing", var),
            ConfigError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            ConfigError::InvalidNumber(var) => write!(f, "{} must be a valid number", var),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_base_url = std::env::var("TOPUP_API_BASE_URL")
            .map_err(|_| ConfigError::MissingRequiredEnvVar("TOPUP_API_BASE_URL".to_string()))?;

        let poll_interval_ms = match std::env::var("TOPUP_POLL_INTERVAL_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber("TOPUP_POLL_INTERVAL_MS".to_string()))?,
            Err(_) => 2000,
        };

        let request_timeout_secs = match std::env::var("TOPUP_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber("TOPUP_REQUEST_TIMEOUT_SECS".to_string()))?,
            Err(_) => 10,
        };

        let config = Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(poll_interval_ms),
            request_timeout: Duration::from_secs(request_timeout_secs),
        };

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(self.api_base_url.clone()));
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidNumber("TOPUP_POLL_INTERVAL_MS".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = Config {
            api_base_url: "localhost:3000".to_string(),
            poll_interval: Duration::from_millis(2000),
            request_timeout: Duration::from_secs(10),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = Config {
            api_base_url: "https://api.example.com".to_string(),
            poll_interval: Duration::ZERO,
            request_timeout: Duration::from_secs(10),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = Config {
            api_base_url: "https://api.example.com".trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(2000),
            request_timeout: Duration::from_secs(10),
        };
        assert!(config.validate().is_ok());
        assert!(!config.api_base_url.ends_with('/'));
    }
}
