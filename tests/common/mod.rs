//! Scripted flight and hotel sources shared by the integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use chrono::NaiveDate;

use farescan::models::{FlightQuery, FlightSearch, HotelFilters, HotelQuery, Route, SeatClass, TripType};
use farescan::web::{self, AppState};
use farescan::{
    ExchangeRates, FarescanError, FlightSource, HotelOffer, HotelSource, ItineraryCandidate, Price,
    Result, TripPlanner,
};

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

pub fn today() -> NaiveDate {
    date(2, 20)
}

/// Provider answer for one departure date
#[derive(Debug, Clone)]
pub enum Fare {
    Priced(f64, &'static str),
    Fail,
}

/// Flights priced per departure date; unlisted dates have no flights
#[derive(Default)]
pub struct FakeFlights {
    fares: HashMap<NaiveDate, Fare>,
    pub calls: AtomicUsize,
}

impl FakeFlights {
    pub fn new(fares: Vec<(NaiveDate, Fare)>) -> Self {
        Self {
            fares: fares.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every query fails
    pub fn down() -> Self {
        let mut fares = HashMap::new();
        let mut day = date(1, 1);
        while day < date(12, 31) {
            fares.insert(day, Fare::Fail);
            day = day.succ_opt().unwrap();
        }
        Self {
            fares,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FlightSource for FakeFlights {
    async fn cheapest_flight(&self, query: &FlightQuery) -> Result<Option<ItineraryCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fares.get(&query.depart_date) {
            Some(Fare::Priced(amount, currency)) => Ok(Some(ItineraryCandidate {
                route: query.route.clone(),
                depart_date: query.depart_date,
                return_date: query.return_date,
                price: Price::new(*amount, *currency),
                price_raw: format!("{amount} {currency}"),
                airline: "Fake Air".to_string(),
            })),
            Some(Fare::Fail) => Err(FarescanError::upstream("Flight search", "bridge down")),
            None => Ok(None),
        }
    }
}

/// The same price list for every stay; `None` makes every request fail
pub struct FakeHotels {
    prices: Option<Vec<f64>>,
}

impl FakeHotels {
    pub fn priced(prices: &[f64]) -> Self {
        Self {
            prices: Some(prices.to_vec()),
        }
    }

    pub fn empty() -> Self {
        Self {
            prices: Some(Vec::new()),
        }
    }

    pub fn down() -> Self {
        Self { prices: None }
    }
}

#[async_trait]
impl HotelSource for FakeHotels {
    async fn search_offers(&self, query: &HotelQuery) -> Result<Vec<HotelOffer>> {
        let prices = self
            .prices
            .as_ref()
            .ok_or_else(|| FarescanError::upstream("Hotel search", "HTTP 503"))?;
        Ok(prices
            .iter()
            .enumerate()
            .map(|(i, amount)| HotelOffer {
                rank: 0,
                hotel_id: format!("lp{i}"),
                name: format!("Hotel {i}"),
                star_rating: Some(4.0),
                address: format!("{} {i}-chome", query.city),
                price: Price::new(*amount, &query.currency),
                refundable_tag: "RFN".to_string(),
                stay: query.stay,
            })
            .collect())
    }
}

pub fn planner(flights: FakeFlights, hotels: FakeHotels) -> TripPlanner {
    TripPlanner::new(
        Arc::new(flights),
        Arc::new(hotels),
        ExchangeRates::new([("USD/KRW", 1350.0)]),
    )
}

pub fn app(planner: TripPlanner, key: Option<&str>) -> Router {
    web::router(AppState::new(planner, key.map(str::to_string)).with_today(today))
}

pub fn hotel_filters() -> HotelFilters {
    HotelFilters {
        city: "Tokyo".to_string(),
        country_code: "JP".to_string(),
        min_stars: 4,
        max_stars: 5,
        adults: 2,
        currency: "KRW".to_string(),
        nationality: "KR".to_string(),
        limit: 50,
    }
}

pub fn flight_search(trip: TripType, stay_nights: u32) -> FlightSearch {
    FlightSearch {
        route: Route::new("ICN", "NRT").unwrap(),
        trip,
        seat: SeatClass::Economy,
        adults: 1,
        stay_nights,
    }
}

/// Fares in USD on three March dates: 120, 95, 110
pub fn march_fares() -> FakeFlights {
    FakeFlights::new(vec![
        (date(3, 5), Fare::Priced(120.0, "USD")),
        (date(3, 12), Fare::Priced(95.0, "USD")),
        (date(3, 20), Fare::Priced(110.0, "USD")),
    ])
}
