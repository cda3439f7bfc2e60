use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub sms_gateway_url: Option<String>,
    pub tracking_base_url: String,
    pub tracking_seed: Option<u64>,
    pub settlement_job_enabled: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let sms_gateway_url = env_map.get("SMS_GATEWAY_URL").cloned();

        let tracking_base_url = env_map
            .get("TRACKING_BASE_URL")
            .cloned()
            .unwrap_or_else(|| format!("http://localhost:{}/track-cargo", port));

        let tracking_seed = match env_map.get("TRACKING_SEED") {
            None => None,
            Some(s) => Some(s.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "TRACKING_SEED".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?),
        };

        let settlement_job_enabled = match env_map
            .get("SETTLEMENT_JOB_ENABLED")
            .map(|s| s.as_str())
            .unwrap_or("true")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "SETTLEMENT_JOB_ENABLED".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(Config {
            port,
            database_path,
            sms_gateway_url,
            tracking_base_url,
            tracking_seed,
            settlement_job_enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/test.db".to_string());
        map
    }

    #[test]
    fn test_missing_database_path() {
        let result = Config::from_env_map(HashMap::new());
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.sms_gateway_url.is_none());
        assert!(config.tracking_seed.is_none());
        assert!(config.settlement_job_enabled);
        assert_eq!(config.tracking_base_url, "http://localhost:8080/track-cargo");
    }

    #[test]
    fn test_invalid_tracking_seed() {
        let mut env_map = setup_required_env();
        env_map.insert("TRACKING_SEED".to_string(), "abc".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "TRACKING_SEED"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_settlement_job_toggle() {
        let mut env_map = setup_required_env();
        env_map.insert("SETTLEMENT_JOB_ENABLED".to_string(), "false".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert!(!config.settlement_job_enabled);
    }
}
