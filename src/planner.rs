//! Trip planning: runs the flight and hotel stages for one search and
//! combines their cheapest answers.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::exchange::ExchangeRates;
use crate::flights::{FlightScanner, FlightSource};
use crate::hotels::{HotelLookup, HotelSource, MonthlyHotelScan};
use crate::models::{FlightSearch, HotelFilters, HotelOffer, ItineraryCandidate, Price, ScanWindow, Stay};
use crate::{FarescanError, Result};

/// Cheapest itinerary and hotel for the same dates, with their exact sum
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombinedResult {
    pub itinerary: ItineraryCandidate,
    pub hotel: HotelOffer,
    pub stay: Stay,
    pub total: Price,
}

/// Join an itinerary and a hotel offer.
///
/// An upstream failure on either side is returned as-is, the flight side
/// first. The offer must cover the itinerary's dates and both prices must
/// share a currency.
pub fn combine(
    itinerary: Result<ItineraryCandidate>,
    hotel: Result<HotelOffer>,
) -> Result<CombinedResult> {
    let itinerary = itinerary?;
    let hotel = hotel?;

    let dates_match = hotel.stay.check_in == itinerary.depart_date
        && itinerary
            .return_date
            .is_none_or(|return_date| return_date == hotel.stay.check_out);
    if !dates_match {
        return Err(FarescanError::validation(format!(
            "hotel stay {} to {} does not match the flight dates",
            hotel.stay.check_in, hotel.stay.check_out
        )));
    }

    if !itinerary.price.same_currency(&hotel.price) {
        return Err(FarescanError::validation(format!(
            "cannot add {} and {} prices",
            itinerary.price.currency, hotel.price.currency
        )));
    }

    let total = Price::new(
        itinerary.price.amount + hotel.price.amount,
        hotel.price.currency.clone(),
    );
    Ok(CombinedResult {
        stay: hotel.stay,
        itinerary,
        hotel,
        total,
    })
}

/// Which search to run, with the parameters only that search needs
#[derive(Debug, Clone, PartialEq)]
pub enum SearchMode {
    /// Top hotel offers for fixed dates
    HotelPeriod { stay: Stay, top_n: usize },
    /// Cheapest `nights`-long stay over a month
    HotelMonth { year: i32, month: u32, nights: u32 },
    /// Hotels for fixed dates plus the flight on those dates
    FlightHotelPeriod {
        stay: Stay,
        top_n: usize,
        flight: FlightSearch,
    },
    /// Cheapest flight of the month plus a hotel for its dates
    FlightHotelMonth {
        year: i32,
        month: u32,
        top_n: usize,
        flight: FlightSearch,
    },
}

impl SearchMode {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SearchMode::HotelPeriod { .. } => "hotel_period",
            SearchMode::HotelMonth { .. } => "hotel_month",
            SearchMode::FlightHotelPeriod { .. } => "flight_hotel_period",
            SearchMode::FlightHotelMonth { .. } => "flight_hotel_month",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub mode: SearchMode,
    pub hotel: HotelFilters,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchOutcome {
    HotelPeriod {
        hotels: Vec<HotelOffer>,
    },
    HotelMonth {
        scan: MonthlyHotelScan,
    },
    FlightHotelPeriod {
        hotels: Vec<HotelOffer>,
        flight: Option<ItineraryCandidate>,
        flight_error: Option<String>,
        combined: Option<CombinedResult>,
    },
    FlightHotelMonth {
        /// The itinerary as priced by the provider
        flight: ItineraryCandidate,
        hotels: Vec<HotelOffer>,
        combined: CombinedResult,
    },
}

pub struct TripPlanner {
    scanner: FlightScanner,
    lookup: HotelLookup,
    rates: ExchangeRates,
}

impl TripPlanner {
    pub fn new(
        flights: Arc<dyn FlightSource>,
        hotels: Arc<dyn HotelSource>,
        rates: ExchangeRates,
    ) -> Self {
        Self {
            scanner: FlightScanner::new(flights),
            lookup: HotelLookup::new(hotels),
            rates,
        }
    }

    /// Run one search. `today` bounds the month scan windows.
    #[instrument(name = "search", skip(self, request), fields(mode = request.mode.name()))]
    pub async fn search(&self, request: &SearchRequest, today: NaiveDate) -> Result<SearchOutcome> {
        match &request.mode {
            SearchMode::HotelPeriod { stay, top_n } => {
                let mut hotels = self.lookup.offers(&request.hotel.for_stay(*stay)).await?;
                hotels.truncate(*top_n);
                Ok(SearchOutcome::HotelPeriod { hotels })
            }
            SearchMode::HotelMonth {
                year,
                month,
                nights,
            } => {
                let window = ScanWindow::for_month(*year, *month, today)?;
                let scan = self
                    .lookup
                    .cheapest_in_window(&request.hotel, &window, *nights)
                    .await?;
                Ok(SearchOutcome::HotelMonth { scan })
            }
            SearchMode::FlightHotelPeriod {
                stay,
                top_n,
                flight,
            } => {
                self.flight_hotel_period(&request.hotel, flight, *stay, *top_n)
                    .await
            }
            SearchMode::FlightHotelMonth {
                year,
                month,
                top_n,
                flight,
            } => {
                let window = ScanWindow::for_month(*year, *month, today)?;
                self.flight_hotel_month(&request.hotel, flight, &window, *top_n)
                    .await
            }
        }
    }

    /// Scan → lookup → combine. A hotel failure fails the whole search.
    async fn flight_hotel_month(
        &self,
        hotel: &HotelFilters,
        search: &FlightSearch,
        window: &ScanWindow,
        top_n: usize,
    ) -> Result<SearchOutcome> {
        let flight = self.scanner.cheapest_in_window(search, window).await?;

        let stay = flight.stay(search.stay_nights)?;
        let mut hotels = self.lookup.offers(&hotel.for_stay(stay)).await?;

        let normalized = self.normalize(flight.clone(), &hotel.currency)?;
        let combined = combine(Ok(normalized), hotels.first().cloned().ok_or_else(|| {
            FarescanError::no_results("No hotel offers found")
        }))?;
        hotels.truncate(top_n);

        info!(
            "Cheapest trip {} ({} + {})",
            combined.total.format(),
            combined.itinerary.price.format(),
            combined.hotel.price.format()
        );
        Ok(SearchOutcome::FlightHotelMonth {
            flight,
            hotels,
            combined,
        })
    }

    /// Hotels first; the flight on the same dates is optional.
    async fn flight_hotel_period(
        &self,
        hotel: &HotelFilters,
        search: &FlightSearch,
        stay: Stay,
        top_n: usize,
    ) -> Result<SearchOutcome> {
        let mut hotels = self.lookup.offers(&hotel.for_stay(stay)).await?;
        let cheapest_hotel = hotels
            .first()
            .cloned()
            .ok_or_else(|| FarescanError::no_results("No hotel offers found"));
        hotels.truncate(top_n);

        let flight = self
            .scanner
            .cheapest_on(search, stay.check_in, Some(stay.check_out))
            .await;

        let (flight, flight_error, combined) = match flight {
            Ok(flight) => {
                let combined = self
                    .normalize(flight.clone(), &hotel.currency)
                    .and_then(|normalized| combine(Ok(normalized), cheapest_hotel));
                match combined {
                    Ok(combined) => (Some(flight), None, Some(combined)),
                    Err(e) => (Some(flight), Some(e.user_message()), None),
                }
            }
            Err(e) => {
                warn!("Flight lookup for {} failed: {}", stay.check_in, e);
                (None, Some(e.user_message()), None)
            }
        };

        Ok(SearchOutcome::FlightHotelPeriod {
            hotels,
            flight,
            flight_error,
            combined,
        })
    }

    fn normalize(&self, flight: ItineraryCandidate, currency: &str) -> Result<ItineraryCandidate> {
        let price = self.rates.convert(&flight.price, currency)?;
        Ok(flight.with_price(price))
    }
}
