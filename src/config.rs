//! Application configuration loaded from environment variables.
//!
//! Every setting has a default, so a bare `cargo run` works locally.

use crate::db::keys;
use crate::models::Coordinates;
use crate::services::display::DEFAULT_ERROR_DISPLAY_MS;
use crate::services::map::DEFAULT_ZOOM;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Directory holding the persisted snapshots
    pub data_dir: PathBuf,
    /// Key the workout snapshot is stored under
    pub storage_key: String,
    /// Zoom level for centering the map
    pub map_zoom: u8,
    /// How long validation messages stay visible
    pub error_display_ms: i64,
    /// Starting position, used in place of browser geolocation when set
    pub home: Option<Coordinates>,
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let home = match (
            parse_var::<f64>("HOME_LAT")?,
            parse_var::<f64>("HOME_LNG")?,
        ) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            (None, None) => None,
            _ => {
                return Err(ConfigError::Invalid(
                    "HOME_LAT",
                    "HOME_LAT and HOME_LNG must be set together".to_string(),
                ))
            }
        };

        Ok(Self {
            port: parse_var("PORT")?.unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            storage_key: env::var("STORAGE_KEY").unwrap_or_else(|_| keys::WORKOUTS.to_string()),
            map_zoom: parse_var("MAP_ZOOM")?.unwrap_or(DEFAULT_ZOOM),
            error_display_ms: parse_var("ERROR_DISPLAY_MS")?.unwrap_or(DEFAULT_ERROR_DISPLAY_MS),
            home,
        })
    }

    /// Config for tests: no `.env`, no environment lookups.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            data_dir: PathBuf::from("data"),
            storage_key: keys::WORKOUTS.to_string(),
            map_zoom: DEFAULT_ZOOM,
            error_display_ms: DEFAULT_ERROR_DISPLAY_MS,
            home: None,
        }
    }
}

/// Parse an optional environment variable.
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid(name, e.to_string())),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
