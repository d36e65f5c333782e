//! Data models for the farescan application
//!
//! - Price: currency-tagged amounts and provider price parsing
//! - Calendar: stays and month scan windows
//! - Flight: queries and itinerary candidates
//! - Hotel: queries and offers

pub mod calendar;
pub mod flight;
pub mod hotel;
pub mod price;

// Re-export all public types for convenient access
pub use calendar::{ScanWindow, Stay};
pub use flight::{FlightQuery, FlightSearch, ItineraryCandidate, Route, SeatClass, TripType};
pub use hotel::{HotelFilters, HotelOffer, HotelQuery, rank_offers};
pub use price::Price;
