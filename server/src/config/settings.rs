use std::env;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppSettings {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres URL. `None` selects the in-memory document store.
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub token_duration_hours: i64,
    pub secure_cookies: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub admin: Option<SeedAdmin>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedAdmin {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl AppSettings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // App config
        let app_name = var_or("APP_NAME", "gym-studio");
        let environment = var_or("ENVIRONMENT", "development").trim().to_string();

        // Database config
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let max_connections = var_or("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|_| AppError::Configuration("DATABASE_MAX_CONNECTIONS must be a valid number".to_string()))?;

        // Server config
        let server_host = var_or("SERVER_HOST", "0.0.0.0");
        let server_port = var_or("PORT", "8080")
            .parse::<u16>()
            .map_err(|_| AppError::Configuration("PORT must be a valid port number".to_string()))?;

        let cors_origins = var_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Auth config
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| AppError::Configuration("JWT_SECRET must be set".to_string()))?;

        let token_duration_hours = var_or("JWT_TOKEN_DURATION_HOURS", "24")
            .parse::<i64>()
            .ok()
            .filter(|hours| *hours > 0)
            .ok_or_else(|| AppError::Configuration("JWT_TOKEN_DURATION_HOURS must be a positive number".to_string()))?;

        // Bootstrap admin, only when all three values are present
        let seed_admin = match (
            lookup("SEED_ADMIN_NAME"),
            lookup("SEED_ADMIN_EMAIL"),
            lookup("SEED_ADMIN_PASSWORD"),
        ) {
            (Some(name), Some(email), Some(password)) => Some(SeedAdmin { name, email, password }),
            _ => None,
        };

        let app = AppConfig {
            name: app_name,
            environment,
        };
        let secure_cookies = app.is_production();

        Ok(Self {
            app,
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            server: ServerConfig {
                host: server_host,
                port: server_port,
                cors_origins,
            },
            auth: AuthConfig {
                jwt_secret,
                token_duration_hours,
                secure_cookies,
            },
            bootstrap: BootstrapConfig { admin: seed_admin },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Result<AppSettings, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[("JWT_SECRET", "secret")]).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.cors_origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(settings.auth.token_duration_hours, 24);
        assert!(!settings.auth.secure_cookies);
        assert!(settings.database.url.is_none());
        assert!(settings.bootstrap.admin.is_none());
    }

    #[test]
    fn test_missing_jwt_secret_is_configuration_error() {
        let result = settings_from(&[("PORT", "9000")]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = settings_from(&[("JWT_SECRET", "secret"), ("PORT", "not-a-port")]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_non_positive_token_duration_is_rejected() {
        let result = settings_from(&[("JWT_SECRET", "secret"), ("JWT_TOKEN_DURATION_HOURS", "0")]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_production_enables_secure_cookies() {
        let settings = settings_from(&[
            ("JWT_SECRET", "secret"),
            ("ENVIRONMENT", "production"),
            ("DATABASE_URL", "postgres://localhost/gym"),
            ("CORS_ORIGINS", "https://gym.example, https://admin.gym.example"),
        ])
        .unwrap();
        assert!(settings.auth.secure_cookies);
        assert_eq!(settings.database.url.as_deref(), Some("postgres://localhost/gym"));
        assert_eq!(settings.server.cors_origins.len(), 2);
    }

    #[test]
    fn test_seed_admin_requires_all_fields() {
        let partial = settings_from(&[("JWT_SECRET", "secret"), ("SEED_ADMIN_EMAIL", "a@b.c")]).unwrap();
        assert!(partial.bootstrap.admin.is_none());

        let full = settings_from(&[
            ("JWT_SECRET", "secret"),
            ("SEED_ADMIN_NAME", "Root"),
            ("SEED_ADMIN_EMAIL", "root@gym.example"),
            ("SEED_ADMIN_PASSWORD", "changeme"),
        ])
        .unwrap();
        assert_eq!(full.bootstrap.admin.unwrap().email, "root@gym.example");
    }
}
