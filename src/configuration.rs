use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_DATA_PATH: &str = "./data";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TRIP_CACHE_SIZE: usize = 250;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigurationError {
    #[error("{name} has an invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Settings of the server, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// `GTFS_DATA_PATH`: directory or zip archive holding the feed
    pub data_path: PathBuf,
    /// `PORT`
    pub port: u16,
    /// `TRIP_CACHE_SIZE`: number of trip details kept in memory, 0 to disable
    pub trip_cache_size: usize,
    /// `GTFS_PRELOAD`: read every table at startup instead of on first request
    pub preload: bool,
    /// `GTFS_TRIM_FIELDS`
    pub trim_fields: bool,
}

impl Configuration {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Configuration {
            data_path: lookup("GTFS_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            trip_cache_size: parse_var(&lookup, "TRIP_CACHE_SIZE", DEFAULT_TRIP_CACHE_SIZE)?,
            preload: parse_flag(&lookup, "GTFS_PRELOAD", false)?,
            trim_fields: parse_flag(&lookup, "GTFS_TRIM_FIELDS", true)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigurationError::InvalidValue { name, value }),
    }
}

fn parse_flag<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match lookup(name) {
        None => return Ok(default),
        Some(value) => value,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        "" => Ok(default),
        _ => Err(ConfigurationError::InvalidValue { name, value }),
    }
}
