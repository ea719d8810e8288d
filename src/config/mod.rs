use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("SERVER_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging =
                v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout =
                v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "blog-api-dev-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                // Must be overridden via JWT_SECRET outside development
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                enable_request_logging: false,
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert!(!config.server.enable_request_logging);
    }
}
