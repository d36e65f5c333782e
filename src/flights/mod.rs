//! Flight pricing
//!
//! - `FlightSource`: one priced answer per (date, route) query
//! - `provider`: HTTP client for the flight-search bridge
//! - `scanner`: cheapest itinerary across a month

use async_trait::async_trait;

use crate::Result;
use crate::models::{FlightQuery, ItineraryCandidate};

pub mod provider;
pub mod scanner;

pub use provider::{FetchMode, FlightBridgeClient};
pub use scanner::FlightScanner;

/// External flight-data provider
#[async_trait]
pub trait FlightSource: Send + Sync {
    /// Cheapest flight for the query's dates, `None` when the provider has no flights
    async fn cheapest_flight(&self, query: &FlightQuery) -> Result<Option<ItineraryCandidate>>;
}
