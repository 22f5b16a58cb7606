//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MS};

pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_COUNTRIES_API_URL: &str = "https://restcountries.com/v3.1/alpha";
pub const DEFAULT_PLACES_API_URL: &str = "https://places-api.foursquare.com/places/search";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL in milliseconds for cached records
    pub default_ttl_ms: u64,
    /// Directory for the cache snapshot; None runs the cache memory-only
    pub cache_dir: Option<PathBuf>,
    /// HTTP server port
    pub server_port: u16,
    /// Upstream provider endpoints and credentials
    pub upstream: UpstreamConfig,
}

/// Endpoints and credentials of the three upstream providers.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub weather_url: String,
    pub countries_url: String,
    pub places_url: String,
    pub weather_api_key: Option<String>,
    pub places_api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 50)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 1800000)
    /// - `CACHE_DIR` - Snapshot directory (default: unset, memory-only)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `WEATHER_API_URL`, `COUNTRIES_API_URL`, `PLACES_API_URL` - Provider endpoints
    /// - `WEATHER_API_KEY`, `PLACES_API_KEY` - Provider credentials (default: unset)
    /// - `UPSTREAM_TIMEOUT_SECS` - Per-request upstream timeout (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_ttl_ms: parse_var("CACHE_DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            cache_dir: non_empty_var("CACHE_DIR").map(PathBuf::from),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            upstream: UpstreamConfig {
                weather_url: non_empty_var("WEATHER_API_URL")
                    .unwrap_or(defaults.upstream.weather_url),
                countries_url: non_empty_var("COUNTRIES_API_URL")
                    .unwrap_or(defaults.upstream.countries_url),
                places_url: non_empty_var("PLACES_API_URL")
                    .unwrap_or(defaults.upstream.places_url),
                weather_api_key: non_empty_var("WEATHER_API_KEY"),
                places_api_key: non_empty_var("PLACES_API_KEY"),
                timeout: parse_var("UPSTREAM_TIMEOUT_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.upstream.timeout),
            },
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl_ms: DEFAULT_TTL_MS,
            cache_dir: None,
            server_port: 3000,
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            weather_url: DEFAULT_WEATHER_API_URL.to_string(),
            countries_url: DEFAULT_COUNTRIES_API_URL.to_string(),
            places_url: DEFAULT_PLACES_API_URL.to_string(),
            weather_api_key: None,
            places_api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}
