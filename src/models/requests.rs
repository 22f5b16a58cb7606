//! Request DTOs for the city lookup API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query string of `GET /api/search`
///
/// # Fields
/// - `city`: The city name to look up
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub city: Option<String>,
}

impl SearchQuery {
    /// Returns the trimmed city name, or an error message if it is missing.
    pub fn city_name(&self) -> Result<&str, String> {
        match self.city.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err("City name is required".to_string()),
        }
    }
}
