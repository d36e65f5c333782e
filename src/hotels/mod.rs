//! Hotel pricing
//!
//! - `HotelSource`: offers for one stay
//! - `liteapi`: LiteAPI rates client
//! - `lookup`: cheapest offer for a stay or across a month

use async_trait::async_trait;

use crate::Result;
use crate::models::{HotelOffer, HotelQuery};

pub mod liteapi;
pub mod lookup;

pub use liteapi::LiteApiClient;
pub use lookup::{HotelLookup, MonthlyHotelScan};

/// External hotel-search API
#[async_trait]
pub trait HotelSource: Send + Sync {
    /// Every priced offer for the query's stay; an empty list when nothing is available
    async fn search_offers(&self, query: &HotelQuery) -> Result<Vec<HotelOffer>>;
}
