//! Fetch Module
//!
//! Cache-first lookup of aggregated city records.

mod aggregator;
mod fetcher;

pub use aggregator::{CityAggregator, HttpAggregator, MAX_PLACES};
pub use fetcher::CityFetcher;
