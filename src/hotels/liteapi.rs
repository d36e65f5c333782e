//! LiteAPI hotel rates client
//!
//! Posts a rates search to `/hotels/rates` and turns the response into
//! ranked `HotelOffer`s, one per hotel (its cheapest room type).

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::HotelSource;
use crate::config::HotelsConfig;
use crate::http_client::{ClientSettings, build_client};
use crate::models::{HotelOffer, HotelQuery, Price, rank_offers};
use crate::{FarescanError, Result};

const SERVICE: &str = "Hotel search";

pub struct LiteApiClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RatesRequest<'a> {
    occupancies: Vec<Occupancy>,
    sort: Vec<SortField>,
    star_rating: Vec<u8>,
    currency: &'a str,
    guest_nationality: &'a str,
    checkin: NaiveDate,
    checkout: NaiveDate,
    max_rates_per_hotel: u32,
    board_type: &'static str,
    refundable_rates_only: bool,
    city_name: &'a str,
    country_code: &'a str,
    include_hotel_data: bool,
    limit: u32,
}

#[derive(Debug, Serialize)]
struct Occupancy {
    adults: u32,
}

#[derive(Debug, Serialize)]
struct SortField {
    field: &'static str,
    direction: &'static str,
}

impl<'a> RatesRequest<'a> {
    fn from_query(query: &'a HotelQuery) -> Self {
        Self {
            occupancies: vec![Occupancy {
                adults: query.adults,
            }],
            sort: vec![SortField {
                field: "price",
                direction: "ascending",
            }],
            star_rating: query.star_ratings(),
            currency: &query.currency,
            guest_nationality: &query.nationality,
            checkin: query.stay.check_in,
            checkout: query.stay.check_out,
            max_rates_per_hotel: 1,
            board_type: "RO",
            refundable_rates_only: false,
            city_name: &query.city,
            country_code: &query.country_code,
            include_hotel_data: true,
            limit: query.limit,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    data: Vec<HotelRates>,
    #[serde(default)]
    hotels: Vec<HotelInfo>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<i64>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotelRates {
    #[serde(default)]
    hotel_id: String,
    hotel: Option<HotelInfo>,
    hotel_name: Option<String>,
    #[serde(default)]
    room_types: Vec<RoomType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotelInfo {
    id: Option<String>,
    name: Option<String>,
    hotel_name: Option<String>,
    star_rating: Option<f32>,
    rating: Option<f32>,
    address: Option<Address>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Address {
    Line(String),
    Structured {
        line1: Option<String>,
        city: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomType {
    offer_retail_rate: Option<Amount>,
    #[serde(default)]
    rates: Vec<Rate>,
}

#[derive(Debug, Deserialize)]
struct Amount {
    amount: Option<f64>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Rate {
    cancellation_policies: Option<CancellationPolicies>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancellationPolicies {
    refundable_tag: Option<String>,
}

impl HotelInfo {
    fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
            || self.hotel_name.as_deref().is_some_and(|n| !n.is_empty())
    }

    fn display_address(&self) -> String {
        match &self.address {
            Some(Address::Line(line)) => line.clone(),
            Some(Address::Structured { line1, city }) => line1
                .clone()
                .filter(|l| !l.is_empty())
                .or_else(|| city.clone())
                .unwrap_or_default(),
            None => String::new(),
        }
    }
}

impl RoomType {
    fn amount(&self) -> Option<f64> {
        self.offer_retail_rate.as_ref()?.amount
    }
}

impl LiteApiClient {
    pub fn new(config: &HotelsConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .context("Hotel API key is not configured (LITEAPI_KEY)")?;

        let client = build_client(ClientSettings::new(
            config.connect_timeout_seconds,
            config.timeout_seconds,
            config.max_retries,
        ))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl HotelSource for LiteApiClient {
    #[instrument(name = "hotel_rates", skip(self, query), fields(city = %query.city, check_in = %query.stay.check_in, check_out = %query.stay.check_out))]
    async fn search_offers(&self, query: &HotelQuery) -> Result<Vec<HotelOffer>> {
        let start_time = Instant::now();
        let url = format!("{}/hotels/rates", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("accept", "application/json")
            .header("X-API-Key", &self.api_key)
            .json(&RatesRequest::from_query(query))
            .send()
            .await
            .map_err(|e| FarescanError::upstream(SERVICE, format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return match status.as_u16() {
                401 | 403 => Err(FarescanError::upstream(
                    SERVICE,
                    "LiteAPI rejected the API key",
                )),
                429 => Err(FarescanError::upstream(
                    SERVICE,
                    "LiteAPI rate limit exceeded",
                )),
                _ => Err(FarescanError::upstream(
                    SERVICE,
                    format!("LiteAPI error {status}: {error_text}"),
                )),
            };
        }

        let rates: RatesResponse = response
            .json()
            .await
            .map_err(|e| FarescanError::upstream(SERVICE, format!("invalid response: {e}")))?;

        if let Some(error) = &rates.error {
            warn!(
                "LiteAPI reported error {:?}: {}",
                error.code,
                error.description.as_deref().unwrap_or("")
            );
        }

        let offers = offers_from_response(rates, query);
        info!(
            "LiteAPI returned {} priced hotels in {:.3}s",
            offers.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(offers)
    }
}

/// One offer per hotel (cheapest room type), sorted and ranked by price
fn offers_from_response(response: RatesResponse, query: &HotelQuery) -> Vec<HotelOffer> {
    let metadata: HashMap<String, HotelInfo> = response
        .hotels
        .into_iter()
        .filter_map(|info| info.id.clone().map(|id| (id, info)))
        .collect();

    let mut offers = Vec::with_capacity(response.data.len());

    for hotel in response.data {
        let info = match hotel.hotel {
            Some(info) if info.has_name() => info,
            _ => metadata.get(&hotel.hotel_id).cloned().unwrap_or_default(),
        };

        let Some(best_room) = hotel
            .room_types
            .iter()
            .filter(|room| room.amount().is_some())
            .min_by(|a, b| {
                let a = a.amount().unwrap_or(f64::INFINITY);
                let b = b.amount().unwrap_or(f64::INFINITY);
                a.total_cmp(&b)
            })
        else {
            debug!("Skipping hotel {} without a priced room", hotel.hotel_id);
            continue;
        };

        let Some(rate) = best_room.offer_retail_rate.as_ref() else {
            continue;
        };
        let Some(amount) = rate.amount else {
            continue;
        };
        let currency = rate
            .currency
            .clone()
            .unwrap_or_else(|| query.currency.clone());

        let refundable_tag = best_room
            .rates
            .first()
            .and_then(|r| r.cancellation_policies.as_ref())
            .and_then(|p| p.refundable_tag.clone())
            .unwrap_or_default();

        let name = info
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| info.hotel_name.clone())
            .or(hotel.hotel_name)
            .unwrap_or_default();

        offers.push(HotelOffer {
            rank: 0,
            hotel_id: hotel.hotel_id,
            name,
            star_rating: info.star_rating.or(info.rating),
            address: info.display_address(),
            price: Price::new(amount, currency),
            refundable_tag,
            stay: query.stay,
        });
    }

    rank_offers(&mut offers);
    offers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stay;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Json};
    use axum::{Router, routing::post};

    const API_KEY: &str = "sand_1234567890";

    /// Rates endpoint that checks the API key and otherwise answers with `status`
    async fn spawn_rates_api(status: StatusCode) -> LiteApiClient {
        let app = Router::new().route(
            "/hotels/rates",
            post(move |headers: HeaderMap| async move {
                if headers.get("X-API-Key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
                    return (StatusCode::UNAUTHORIZED, "invalid key").into_response();
                }
                if !status.is_success() {
                    return (status, "internal error").into_response();
                }
                Json(serde_json::json!({
                    "data": [
                        {"hotelId": "lp1", "roomTypes": [{"offerRetailRate": {"amount": 300000, "currency": "KRW"}}]},
                        {"hotelId": "lp2", "roomTypes": [{"offerRetailRate": {"amount": 250000, "currency": "KRW"}}]}
                    ]
                }))
                .into_response()
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        LiteApiClient::new(&HotelsConfig {
            api_key: Some(API_KEY.to_string()),
            base_url: format!("http://{addr}"),
            ..HotelsConfig::default()
        })
        .unwrap()
    }

    fn query() -> HotelQuery {
        HotelQuery {
            city: "Tokyo".to_string(),
            country_code: "JP".to_string(),
            stay: Stay::new(
                NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
            )
            .unwrap(),
            min_stars: 5,
            max_stars: 4,
            adults: 2,
            currency: "KRW".to_string(),
            nationality: "KR".to_string(),
            limit: 50,
        }
    }

    #[test]
    fn test_request_payload() {
        let query = query();
        let payload = serde_json::to_value(RatesRequest::from_query(&query)).unwrap();
        assert_eq!(payload["occupancies"][0]["adults"], 2);
        assert_eq!(payload["sort"][0]["field"], "price");
        assert_eq!(payload["starRating"], serde_json::json!([4, 5]));
        assert_eq!(payload["checkin"], "2026-01-10");
        assert_eq!(payload["checkout"], "2026-01-14");
        assert_eq!(payload["guestNationality"], "KR");
        assert_eq!(payload["cityName"], "Tokyo");
        assert_eq!(payload["countryCode"], "JP");
        assert_eq!(payload["boardType"], "RO");
        assert_eq!(payload["maxRatesPerHotel"], 1);
        assert_eq!(payload["includeHotelData"], true);
        assert_eq!(payload["refundableRatesOnly"], false);
        assert_eq!(payload["limit"], 50);
    }

    #[test]
    fn test_offers_from_response() {
        let response: RatesResponse = serde_json::from_str(
            r#"{
                "data": [
                    {
                        "hotelId": "lp1",
                        "roomTypes": [
                            {"offerRetailRate": {"amount": 820000, "currency": "KRW"},
                             "rates": [{"cancellationPolicies": {"refundableTag": "RFN"}}]},
                            {"offerRetailRate": {"amount": 640000, "currency": "KRW"},
                             "rates": [{"cancellationPolicies": {"refundableTag": "NRFN"}}]}
                        ]
                    },
                    {
                        "hotelId": "lp2",
                        "hotel": {"name": "Shinjuku Grand", "starRating": 5,
                                  "address": {"line1": "1-1 Nishi-Shinjuku", "city": "Tokyo"}},
                        "roomTypes": [{"offerRetailRate": {"amount": 510000}}]
                    },
                    {"hotelId": "lp3", "roomTypes": []},
                    {"hotelId": "lp4", "roomTypes": [{"rates": []}]}
                ],
                "hotels": [
                    {"id": "lp1", "name": "Ginza Stay", "rating": 4, "address": "Ginza 3-chome"}
                ]
            }"#,
        )
        .unwrap();

        let offers = offers_from_response(response, &query());
        assert_eq!(offers.len(), 2);

        assert_eq!(offers[0].rank, 1);
        assert_eq!(offers[0].hotel_id, "lp2");
        assert_eq!(offers[0].name, "Shinjuku Grand");
        assert_eq!(offers[0].address, "1-1 Nishi-Shinjuku");
        assert_eq!(offers[0].price, Price::new(510_000.0, "KRW"));
        assert_eq!(offers[0].star_rating, Some(5.0));

        assert_eq!(offers[1].rank, 2);
        assert_eq!(offers[1].name, "Ginza Stay");
        assert_eq!(offers[1].address, "Ginza 3-chome");
        assert_eq!(offers[1].price.amount, 640_000.0);
        assert_eq!(offers[1].refundable_tag, "NRFN");
        assert_eq!(offers[1].stay, query().stay);
    }

    #[test]
    fn test_error_body_yields_no_offers() {
        let response: RatesResponse = serde_json::from_str(
            r#"{"error": {"code": 2001, "description": "no availability found"}}"#,
        )
        .unwrap();
        assert!(response.error.is_some());
        assert!(offers_from_response(response, &query()).is_empty());
    }

    #[test]
    fn test_client_requires_api_key() {
        assert!(LiteApiClient::new(&HotelsConfig::default()).is_err());

        let config = HotelsConfig {
            api_key: Some("sand_1234567890".to_string()),
            base_url: "https://api.liteapi.travel/v3.0/".to_string(),
            ..HotelsConfig::default()
        };
        let client = LiteApiClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://api.liteapi.travel/v3.0");
    }

    #[tokio::test]
    async fn test_search_offers_over_http() {
        let client = spawn_rates_api(StatusCode::OK).await;
        let offers = client.search_offers(&query()).await.unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].hotel_id, "lp2");
        assert_eq!(offers[0].price, Price::new(250_000.0, "KRW"));
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_failure() {
        let client = spawn_rates_api(StatusCode::INTERNAL_SERVER_ERROR).await;
        let err = client.search_offers(&query()).await.unwrap_err();
        assert!(matches!(err, FarescanError::Upstream { .. }), "{err}");
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_rejected_key_is_upstream_failure() {
        let mut client = spawn_rates_api(StatusCode::OK).await;
        client.api_key = "sand_wrongwrong".to_string();
        let err = client.search_offers(&query()).await.unwrap_err();
        assert!(matches!(err, FarescanError::Upstream { .. }), "{err}");
        assert!(err.to_string().contains("rejected the API key"));
    }
}
