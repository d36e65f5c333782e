use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::FlightSource;
use crate::config::FlightsConfig;
use crate::http_client::{ClientSettings, build_client};
use crate::models::{FlightQuery, ItineraryCandidate, Price};
use crate::{FarescanError, Result};

const SERVICE: &str = "Flight search";

/// Scraping strategy of the flight-search bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Fallback,
    Common,
}

impl FetchMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMode::Fallback => "fallback",
            FetchMode::Common => "common",
        }
    }
}

/// Client for the flight-search bridge (`GET /flights`)
pub struct FlightBridgeClient {
    client: ClientWithMiddleware,
    base_url: String,
    default_currency: String,
}

#[derive(Debug, Deserialize)]
struct FlightsResponse {
    #[serde(default)]
    flights: Vec<RawFlight>,
}

#[derive(Debug, Deserialize)]
struct RawFlight {
    name: Option<String>,
    airline: Option<String>,
    price: Option<RawPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Text(String),
    Number(f64),
}

impl RawPrice {
    fn display(&self) -> String {
        match self {
            RawPrice::Text(text) => text.clone(),
            RawPrice::Number(number) => number.to_string(),
        }
    }
}

impl FlightBridgeClient {
    pub fn new(config: &FlightsConfig) -> anyhow::Result<Self> {
        let client = build_client(ClientSettings::new(
            config.connect_timeout_seconds,
            config.timeout_seconds,
            config.max_retries,
        ))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_currency: config.default_currency.to_uppercase(),
        })
    }

    fn request_url(&self, query: &FlightQuery, mode: FetchMode) -> String {
        let mut url = format!(
            "{}/flights?date={}&from={}&to={}&trip={}&seat={}&adults={}&fetch_mode={}",
            self.base_url,
            query.depart_date,
            urlencoding::encode(&query.route.origin),
            urlencoding::encode(&query.route.destination),
            query.trip.as_str(),
            query.seat.as_str(),
            query.adults,
            mode.as_str(),
        );
        if let Some(return_date) = query.return_date {
            url.push_str(&format!("&return={return_date}"));
        }
        url
    }

    async fn fetch(&self, query: &FlightQuery, mode: FetchMode) -> Result<FlightsResponse> {
        let url = self.request_url(query, mode);
        debug!("Flight bridge request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FarescanError::upstream(SERVICE, format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FarescanError::upstream(
                SERVICE,
                format!("{} mode returned {status}: {body}", mode.as_str()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| FarescanError::upstream(SERVICE, format!("invalid response: {e}")))
    }
}

#[async_trait]
impl FlightSource for FlightBridgeClient {
    #[instrument(name = "flight_query", skip(self, query), fields(route = %query.route, date = %query.depart_date))]
    async fn cheapest_flight(&self, query: &FlightQuery) -> Result<Option<ItineraryCandidate>> {
        let start_time = Instant::now();

        let response = match self.fetch(query, FetchMode::Fallback).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Fallback fetch failed ({}), retrying once in common mode", e);
                self.fetch(query, FetchMode::Common).await?
            }
        };

        let flight_count = response.flights.len();
        let candidate = cheapest_in_response(response.flights, query, &self.default_currency);

        info!(
            "Flight bridge answered with {} flights in {:.3}s",
            flight_count,
            start_time.elapsed().as_secs_f64()
        );
        Ok(candidate)
    }
}

/// Cheapest flight with a parseable price; ties keep provider order
fn cheapest_in_response(
    flights: Vec<RawFlight>,
    query: &FlightQuery,
    default_currency: &str,
) -> Option<ItineraryCandidate> {
    let mut best: Option<ItineraryCandidate> = None;

    for flight in flights {
        let Some(raw_price) = flight.price.as_ref().map(RawPrice::display) else {
            continue;
        };
        let Some(price) = Price::parse(&raw_price, default_currency) else {
            debug!("Skipping flight with unparseable price '{}'", raw_price);
            continue;
        };

        let cheaper = best
            .as_ref()
            .is_none_or(|current| price.amount < current.price.amount);
        if cheaper {
            let airline = flight
                .name
                .filter(|name| !name.is_empty())
                .or(flight.airline.filter(|name| !name.is_empty()))
                .unwrap_or_else(|| "N/A".to_string());
            best = Some(ItineraryCandidate {
                route: query.route.clone(),
                depart_date: query.depart_date,
                return_date: query.return_date,
                price,
                price_raw: raw_price,
                airline,
            });
        }
    }

    best
}
