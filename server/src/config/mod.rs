pub mod settings;

use log::info;
use std::env;
use std::path::Path;

pub use settings::AppSettings;

/// Loads the env file that matches `ENVIRONMENT` before settings are read.
///
/// `production` reads `env/.env`, everything else reads `env/.dev.env`. A plain
/// `.env` in the working directory is still honoured as a fallback.
pub fn load_env_file() {
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    let path = env_file_for(&environment);

    match dotenv::from_path(Path::new(path)) {
        Ok(()) => info!("Loaded environment from {}", path),
        Err(_) => {
            dotenv::dotenv().ok();
        }
    }
}

fn env_file_for(environment: &str) -> &'static str {
    if environment.trim() == "production" {
        "env/.env"
    } else {
        "env/.dev.env"
    }
}

/// Initialize application configuration
pub fn init_config() -> Result<AppSettings, crate::error::AppError> {
    info!("Initializing application configuration from environment");
    AppSettings::from_env()
}
