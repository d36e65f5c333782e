//! Flight search queries and priced itinerary candidates

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::calendar::{Stay, add_days};
use super::price::Price;
use crate::{FarescanError, Result};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TripType {
    OneWay,
    #[default]
    RoundTrip,
}

impl TripType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::OneWay => "one-way",
            TripType::RoundTrip => "round-trip",
        }
    }
}

impl FromStr for TripType {
    type Err = FarescanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "one-way" => Ok(TripType::OneWay),
            "round-trip" => Ok(TripType::RoundTrip),
            other => Err(FarescanError::validation(format!("unknown trip type '{other}'"))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeatClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl SeatClass {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatClass::Economy => "economy",
            SeatClass::PremiumEconomy => "premium_economy",
            SeatClass::Business => "business",
            SeatClass::First => "first",
        }
    }
}

impl FromStr for SeatClass {
    type Err = FarescanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "economy" => Ok(SeatClass::Economy),
            "premium_economy" => Ok(SeatClass::PremiumEconomy),
            "business" => Ok(SeatClass::Business),
            "first" => Ok(SeatClass::First),
            other => Err(FarescanError::validation(format!("unknown seat class '{other}'"))),
        }
    }
}

/// Origin and destination airports (IATA codes)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Route {
    pub origin: String,
    pub destination: String,
}

impl Route {
    pub fn new(origin: &str, destination: &str) -> Result<Self> {
        let origin = normalize_airport(origin)?;
        let destination = normalize_airport(destination)?;
        if origin == destination {
            return Err(FarescanError::validation(format!(
                "origin and destination are both {origin}"
            )));
        }
        Ok(Self {
            origin,
            destination,
        })
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.origin, self.destination)
    }
}

fn normalize_airport(code: &str) -> Result<String> {
    let code = code.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(FarescanError::validation(format!(
            "'{code}' is not a three-letter airport code"
        )));
    }
    Ok(code)
}

/// One flight-provider query: a route on a specific date pair
#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub route: Route,
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub trip: TripType,
    pub seat: SeatClass,
    pub adults: u32,
}

/// Route-level settings shared by every date of a scan
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearch {
    pub route: Route,
    pub trip: TripType,
    pub seat: SeatClass,
    pub adults: u32,
    /// Nights between outbound and return for round trips
    pub stay_nights: u32,
}

impl FlightSearch {
    /// Query for departing on `depart`; round trips return after `stay_nights`.
    pub fn query_for(&self, depart: NaiveDate) -> Result<FlightQuery> {
        let return_date = match self.trip {
            TripType::RoundTrip => Some(add_days(depart, self.stay_nights)?),
            TripType::OneWay => None,
        };
        Ok(self.query_between(depart, return_date))
    }

    /// Query with explicit dates, as used for a fixed travel period
    #[must_use]
    pub fn query_between(&self, depart: NaiveDate, return_date: Option<NaiveDate>) -> FlightQuery {
        FlightQuery {
            route: self.route.clone(),
            depart_date: depart,
            return_date: match self.trip {
                TripType::RoundTrip => return_date,
                TripType::OneWay => None,
            },
            trip: self.trip,
            seat: self.seat,
            adults: self.adults,
        }
    }
}

/// The cheapest priced flight option for one date pair
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ItineraryCandidate {
    pub route: Route,
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub price: Price,
    /// Price string exactly as the provider displayed it
    pub price_raw: String,
    pub airline: String,
}

impl ItineraryCandidate {
    /// Hotel stay matching this itinerary: depart → return, or `nights` for one-way trips
    pub fn stay(&self, nights: u32) -> Result<Stay> {
        match self.return_date {
            Some(return_date) => Stay::new(self.depart_date, return_date),
            None => Stay::from_nights(self.depart_date, nights),
        }
    }

    /// Same itinerary with its price expressed in another currency
    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = price;
        self
    }
}
