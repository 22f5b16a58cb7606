//! Upstream Aggregation
//!
//! Builds a [`CityRecord`] from three providers: weather first, then the
//! country named by the weather report, then places around its coordinates.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::UpstreamConfig;
use crate::error::AggregateError;
use crate::models::{CityRecord, Country, Place, Weather};

/// Maximum number of places kept per record
pub const MAX_PLACES: usize = 5;

const PLACES_API_VERSION: &str = "2025-06-17";
const PLACES_FIELDS: &str = "fsq_place_id,name,categories,latitude,longitude,location,distance";

// == City Aggregator ==
/// Produces a complete city record for a name, or a descriptive failure.
#[async_trait]
pub trait CityAggregator: Send + Sync {
    async fn aggregate(&self, name: &str) -> Result<CityRecord, AggregateError>;
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    results: Vec<Place>,
}

// == HTTP Aggregator ==
/// Aggregates over HTTP. Each provider is called once; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpAggregator {
    client: Client,
    config: UpstreamConfig,
}

impl HttpAggregator {
    /// Creates an aggregator with a client honouring `config.timeout`.
    pub fn new(config: UpstreamConfig) -> Result<Self, AggregateError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn fetch_weather(&self, name: &str, api_key: &str) -> Result<Weather, AggregateError> {
        let request = self.client.get(&self.config.weather_url).query(&[
            ("q", name),
            ("appid", api_key),
            ("units", "metric"),
        ]);
        get_json("weather", request).await
    }

    async fn fetch_country(&self, code: &str) -> Result<Country, AggregateError> {
        let url = format!("{}/{}", self.config.countries_url.trim_end_matches('/'), code);
        let countries: Vec<Country> = get_json("country", self.client.get(url)).await?;

        countries
            .into_iter()
            .next()
            .ok_or_else(|| AggregateError::incomplete(format!("No country found for code {code}")))
    }

    async fn fetch_places(
        &self,
        lat: f64,
        lon: f64,
        api_key: &str,
    ) -> Result<Vec<Place>, AggregateError> {
        let request = self
            .client
            .get(&self.config.places_url)
            .query(&[
                ("ll", format!("{lat},{lon}")),
                ("limit", MAX_PLACES.to_string()),
                ("fields", PLACES_FIELDS.to_string()),
            ])
            .bearer_auth(api_key)
            .header(ACCEPT, "application/json")
            .header("X-Places-Api-Version", PLACES_API_VERSION);

        let mut places = get_json::<PlacesResponse>("places", request).await?.results;
        places.truncate(MAX_PLACES);
        Ok(places)
    }
}

#[async_trait]
impl CityAggregator for HttpAggregator {
    #[instrument(skip(self), fields(city = %name))]
    async fn aggregate(&self, name: &str) -> Result<CityRecord, AggregateError> {
        let weather_key = self
            .config
            .weather_api_key
            .as_deref()
            .ok_or(AggregateError::NotConfigured("Weather"))?;
        let places_key = self
            .config
            .places_api_key
            .as_deref()
            .ok_or(AggregateError::NotConfigured("Places"))?;

        let query = name.trim();
        if query.is_empty() {
            return Err(AggregateError::MissingName);
        }

        let weather = self.fetch_weather(query, weather_key).await?;

        let code = weather.sys.country.trim();
        if code.is_empty() {
            return Err(AggregateError::incomplete(
                "No country code found in weather data",
            ));
        }
        let country = self.fetch_country(code).await?;

        let coord = weather.coord;
        if coord.lat == 0.0 || coord.lon == 0.0 {
            return Err(AggregateError::incomplete(
                "No coordinates found in weather data",
            ));
        }
        let places = self.fetch_places(coord.lat, coord.lon, places_key).await?;

        debug!(places = places.len(), "City aggregated");

        Ok(CityRecord {
            name: name.to_string(),
            weather,
            country,
            places,
        })
    }
}

/// Sends `request` and decodes a successful JSON body.
async fn get_json<T: DeserializeOwned>(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<T, AggregateError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        warn!(provider, status = status.as_u16(), "Upstream returned an error status");
        return Err(AggregateError::upstream(provider, status.as_u16()));
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| AggregateError::Malformed(e.to_string()))
}
