//! Farescan - cheapest monthly flight plus a matching hotel
//!
//! This library scans a month of departure dates for the cheapest
//! itinerary, prices hotels for the resulting stay and combines the two
//! into one trip total. A small web surface serves the search form.

pub mod config;
pub mod error;
pub mod exchange;
pub mod flights;
pub mod hotels;
pub mod http_client;
pub mod models;
pub mod planner;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use config::FarescanConfig;
pub use error::FarescanError;
pub use exchange::ExchangeRates;
pub use flights::{FlightBridgeClient, FlightScanner, FlightSource};
pub use hotels::{HotelLookup, HotelSource, LiteApiClient};
pub use models::{HotelOffer, ItineraryCandidate, Price, ScanWindow, Stay};
pub use planner::{CombinedResult, SearchMode, SearchOutcome, SearchRequest, TripPlanner, combine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, FarescanError>;
