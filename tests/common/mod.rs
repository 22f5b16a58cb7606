//! Shared fixtures: mock upstream providers served by wiremock.

#![allow(dead_code)]

use std::time::Duration;

use city_cache::config::{Config, UpstreamConfig};
use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const WEATHER_KEY: &str = "weather-key";
pub const PLACES_KEY: &str = "places-key";

pub fn upstream_config(server: &MockServer) -> UpstreamConfig {
    UpstreamConfig {
        weather_url: format!("{}/weather", server.uri()),
        countries_url: format!("{}/alpha", server.uri()),
        places_url: format!("{}/places", server.uri()),
        weather_api_key: Some(WEATHER_KEY.to_string()),
        places_api_key: Some(PLACES_KEY.to_string()),
        timeout: Duration::from_secs(2),
    }
}

pub fn app_config(server: &MockServer) -> Config {
    Config {
        upstream: upstream_config(server),
        ..Config::default()
    }
}

pub fn weather_body(country: &str, lat: f64, lon: f64) -> Value {
    json!({
        "coord": { "lon": lon, "lat": lat },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 27.3, "humidity": 48, "pressure": 1009 },
        "wind": { "speed": 3.6, "deg": 280 },
        "clouds": { "all": 0 },
        "sys": { "country": country },
        "name": "Bhopal"
    })
}

pub fn country_body() -> Value {
    json!([{
        "name": { "common": "India", "official": "Republic of India" },
        "region": "Asia",
        "subregion": "Southern Asia"
    }])
}

pub fn places_body(count: usize) -> Value {
    let results: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "fsq_place_id": format!("place-{i}"),
                "name": format!("Place {i}"),
                "location": { "address": format!("{i} Lake Road") },
                "distance": 100 * (i + 1),
                "latitude": 23.25,
                "longitude": 77.41
            })
        })
        .collect();
    json!({ "results": results })
}

/// Mounts all three providers answering successfully for `city`.
///
/// Each provider expects to be called exactly `calls` times.
pub async fn mount_happy_path(server: &MockServer, city: &str, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", city))
        .and(query_param("appid", WEATHER_KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("IN", 23.25, 77.41)))
        .expect(calls)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/alpha/IN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(country_body()))
        .expect(calls)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/places"))
        .and(query_param("ll", "23.25,77.41"))
        .and(query_param("limit", "5"))
        .and(header("authorization", format!("Bearer {PLACES_KEY}").as_str()))
        .and(header("x-places-api-version", "2025-06-17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(places_body(3)))
        .expect(calls)
        .mount(server)
        .await;
}
