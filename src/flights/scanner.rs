//! Month-long flight scan
//!
//! Queries the flight source once per date of a scan window and keeps the
//! cheapest itinerary. A failing date is logged and skipped; only a scan in
//! which no date produced a priced itinerary fails.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::FlightSource;
use crate::models::{FlightSearch, ItineraryCandidate, ScanWindow};
use crate::{FarescanError, Result};

pub struct FlightScanner {
    source: Arc<dyn FlightSource>,
}

impl FlightScanner {
    pub fn new(source: Arc<dyn FlightSource>) -> Self {
        Self { source }
    }

    /// Cheapest itinerary over `window`, first date winning on equal prices
    #[instrument(name = "flight_scan", skip(self, search, window), fields(route = %search.route, dates = window.len()))]
    pub async fn cheapest_in_window(
        &self,
        search: &FlightSearch,
        window: &ScanWindow,
    ) -> Result<ItineraryCandidate> {
        let mut best: Option<ItineraryCandidate> = None;
        let mut failed = 0usize;
        let mut empty = 0usize;

        for &depart in window.dates() {
            let query = search.query_for(depart)?;
            match self.source.cheapest_flight(&query).await {
                Ok(Some(candidate)) => {
                    debug!("{}: {}", depart, candidate.price.format());
                    if best
                        .as_ref()
                        .is_none_or(|current| candidate.price.amount < current.price.amount)
                    {
                        best = Some(candidate);
                    }
                }
                Ok(None) => {
                    debug!("{}: no flights", depart);
                    empty += 1;
                }
                Err(e) => {
                    warn!("{}: flight query failed, skipping: {}", depart, e);
                    failed += 1;
                }
            }
        }

        match best {
            Some(best) => {
                info!(
                    "Cheapest flight {} on {} ({} dates empty, {} failed)",
                    best.price.format(),
                    best.depart_date,
                    empty,
                    failed
                );
                Ok(best)
            }
            None => Err(FarescanError::no_results(format!(
                "No itineraries found for {} ({} dates without flights, {} failed queries)",
                search.route, empty, failed
            ))),
        }
    }

    /// Single-date lookup used for a fixed travel period
    pub async fn cheapest_on(
        &self,
        search: &FlightSearch,
        depart: chrono::NaiveDate,
        return_date: Option<chrono::NaiveDate>,
    ) -> Result<ItineraryCandidate> {
        let query = search.query_between(depart, return_date);
        self.source.cheapest_flight(&query).await?.ok_or_else(|| {
            FarescanError::no_results(format!(
                "No itineraries found for {} on {}",
                search.route, depart
            ))
        })
    }
}
