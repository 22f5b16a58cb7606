//! API Module
//!
//! HTTP handlers and routing for the city lookup REST API.
//!
//! # Endpoints
//! - `GET /api/search?city=<name>` - Aggregated city record
//! - `GET /api/cache/stats` - Cache statistics
//! - `DELETE /api/cache` - Clear the cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
