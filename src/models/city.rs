//! Aggregated city record
//!
//! Field names follow the upstream providers' JSON so records serialize the
//! same way in HTTP bodies and in cache snapshots.

use serde::{Deserialize, Serialize};

/// Weather, country and nearby places for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    /// City name as requested
    pub name: String,
    pub weather: Weather,
    pub country: Country,
    /// Up to five nearby places
    pub places: Vec<Place>,
}

// == Weather ==
/// Current conditions as reported by the weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub main: WeatherMain,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub wind: Wind,
    pub clouds: Clouds,
    pub coord: Coordinates,
    pub sys: WeatherSys,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherMain {
    /// Degrees Celsius
    pub temp: f64,
    /// Percent
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Metres per second
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    /// Cloud cover percentage
    pub all: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSys {
    /// ISO 3166 alpha-2 country code, empty when the provider omits it
    #[serde(default)]
    pub country: String,
}

// == Country ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: CountryName,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
}

// == Places ==
/// A point of interest near the city centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub fsq_place_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PlaceLocation>,
    /// Metres from the queried coordinates
    #[serde(default)]
    pub distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
