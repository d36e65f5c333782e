//! Search form fields and their conversion into a [`SearchRequest`]

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::models::{FlightSearch, HotelFilters, Route, SeatClass, Stay, TripType};
use crate::planner::{SearchMode, SearchRequest};
use crate::{FarescanError, Result};

/// Raw form fields as submitted. Every field is optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TravelForm {
    pub mode: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub adults: Option<String>,
    pub min_stars: Option<String>,
    pub max_stars: Option<String>,
    pub currency: Option<String>,
    pub guest_nat: Option<String>,
    pub limit: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub top_n: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub nights: Option<String>,
    pub origin: Option<String>,
    pub dest: Option<String>,
    pub trip: Option<String>,
    pub seat: Option<String>,
    pub flight_adults: Option<String>,
    pub fh_top_n: Option<String>,
}

/// Form values with defaults filled in, echoed back into the rendered form
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub mode: String,
    pub city: String,
    pub country: String,
    pub adults: u32,
    pub min_stars: u8,
    pub max_stars: u8,
    pub currency: String,
    pub guest_nat: String,
    pub limit: u32,
    pub checkin: String,
    pub checkout: String,
    pub top_n: usize,
    pub year: i32,
    pub month: u32,
    pub nights: u32,
    pub origin: String,
    pub dest: String,
    pub trip: String,
    pub seat: String,
    pub flight_adults: u32,
    pub fh_top_n: usize,
}

/// Trimmed text, or `default` when missing or blank
fn text(raw: &Option<String>, default: &str) -> String {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Parsed number, or `default` when missing or unparseable
fn number<T: FromStr>(raw: &Option<String>, default: T) -> T {
    raw.as_deref()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| FarescanError::validation(format!("{field} '{value}' is not a YYYY-MM-DD date")))
}

impl TravelForm {
    /// Whether a search was asked for, as opposed to just opening the form
    #[must_use]
    pub fn is_submission(&self) -> bool {
        self.mode.as_deref().is_some_and(|m| !m.trim().is_empty())
    }

    /// Fill in defaults. The fixed-period dates default to a four-night stay a month out.
    #[must_use]
    pub fn resolve(&self, today: NaiveDate) -> FormValues {
        let default_checkin = today + chrono::Days::new(30);
        let default_checkout = default_checkin + chrono::Days::new(4);

        FormValues {
            mode: text(&self.mode, "hotel_period"),
            city: text(&self.city, "Tokyo"),
            country: text(&self.country, "JP").to_uppercase(),
            adults: number(&self.adults, 2),
            min_stars: number(&self.min_stars, 4),
            max_stars: number(&self.max_stars, 5),
            currency: text(&self.currency, "KRW").to_uppercase(),
            guest_nat: text(&self.guest_nat, "KR").to_uppercase(),
            limit: number(&self.limit, 50),
            checkin: text(&self.checkin, &default_checkin.to_string()),
            checkout: text(&self.checkout, &default_checkout.to_string()),
            top_n: number(&self.top_n, 10),
            year: number(&self.year, today.year()),
            month: number(&self.month, today.month()),
            nights: number(&self.nights, 3),
            origin: text(&self.origin, "ICN").to_uppercase(),
            dest: text(&self.dest, "NRT").to_uppercase(),
            trip: text(&self.trip, TripType::RoundTrip.as_str()),
            seat: text(&self.seat, SeatClass::Economy.as_str()),
            flight_adults: number(&self.flight_adults, 1),
            fh_top_n: number(&self.fh_top_n, 10),
        }
    }
}

impl FormValues {
    fn stay(&self) -> Result<Stay> {
        let check_in = parse_date("check-in", &self.checkin)?;
        let check_out = parse_date("check-out", &self.checkout)?;
        Stay::new(check_in, check_out)
    }

    fn hotel_filters(&self) -> Result<HotelFilters> {
        if self.adults == 0 {
            return Err(FarescanError::validation("at least one adult guest is required"));
        }
        if self.min_stars > 5 || self.max_stars > 5 {
            return Err(FarescanError::validation("star ratings go from 0 to 5"));
        }
        Ok(HotelFilters {
            city: self.city.clone(),
            country_code: self.country.clone(),
            min_stars: self.min_stars,
            max_stars: self.max_stars,
            adults: self.adults,
            currency: self.currency.clone(),
            nationality: self.guest_nat.clone(),
            limit: self.limit.max(1),
        })
    }

    fn flight_search(&self) -> Result<FlightSearch> {
        if self.flight_adults == 0 {
            return Err(FarescanError::validation("at least one adult passenger is required"));
        }
        Ok(FlightSearch {
            route: Route::new(&self.origin, &self.dest)?,
            trip: self.trip.parse()?,
            seat: self.seat.parse()?,
            adults: self.flight_adults,
            stay_nights: self.nights,
        })
    }

    /// Validate the fields the selected mode needs and build the request.
    pub fn to_request(&self) -> Result<SearchRequest> {
        if self.nights == 0 {
            return Err(FarescanError::validation("stays need at least one night"));
        }

        let mode = match self.mode.as_str() {
            "hotel_period" => SearchMode::HotelPeriod {
                stay: self.stay()?,
                top_n: self.top_n,
            },
            "hotel_month" => SearchMode::HotelMonth {
                year: self.year,
                month: self.month,
                nights: self.nights,
            },
            "flight_hotel_period" => SearchMode::FlightHotelPeriod {
                stay: self.stay()?,
                top_n: self.fh_top_n,
                flight: self.flight_search()?,
            },
            "flight_hotel_month" => SearchMode::FlightHotelMonth {
                year: self.year,
                month: self.month,
                top_n: self.fh_top_n,
                flight: self.flight_search()?,
            },
            other => {
                return Err(FarescanError::validation(format!("unknown search mode '{other}'")));
            }
        };

        Ok(SearchRequest {
            mode,
            hotel: self.hotel_filters()?,
        })
    }
}
