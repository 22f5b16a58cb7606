//! Data models for the city lookup service
//!
//! The aggregated city record plus the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod city;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use city::{
    CityRecord, Clouds, Coordinates, Country, CountryName, Place, PlaceLocation, Weather,
    WeatherCondition, WeatherMain, WeatherSys, Wind,
};
pub use requests::SearchQuery;
pub use responses::{ClearResponse, ErrorResponse, HealthResponse};
