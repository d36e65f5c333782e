//! Hotel search queries and offers

use serde::{Deserialize, Serialize};

use super::calendar::Stay;
use super::price::Price;

/// Destination and guest settings shared by every stay of a search
#[derive(Debug, Clone, PartialEq)]
pub struct HotelFilters {
    pub city: String,
    /// ISO 3166-1 alpha-2 country code
    pub country_code: String,
    pub min_stars: u8,
    pub max_stars: u8,
    pub adults: u32,
    pub currency: String,
    pub nationality: String,
    pub limit: u32,
}

impl HotelFilters {
    #[must_use]
    pub fn for_stay(&self, stay: Stay) -> HotelQuery {
        HotelQuery {
            city: self.city.clone(),
            country_code: self.country_code.clone(),
            stay,
            min_stars: self.min_stars,
            max_stars: self.max_stars,
            adults: self.adults,
            currency: self.currency.clone(),
            nationality: self.nationality.clone(),
            limit: self.limit,
        }
    }
}

/// Parameters of one hotel-rate search
#[derive(Debug, Clone, PartialEq)]
pub struct HotelQuery {
    pub city: String,
    pub country_code: String,
    pub stay: Stay,
    pub min_stars: u8,
    pub max_stars: u8,
    pub adults: u32,
    pub currency: String,
    pub nationality: String,
    pub limit: u32,
}

impl HotelQuery {
    /// Star ratings to request, ascending; a reversed range is swapped
    #[must_use]
    pub fn star_ratings(&self) -> Vec<u8> {
        let (low, high) = if self.min_stars > self.max_stars {
            (self.max_stars, self.min_stars)
        } else {
            (self.min_stars, self.max_stars)
        };
        (low..=high).collect()
    }
}

/// One priced hotel option for a fixed stay
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HotelOffer {
    /// 1-based position after sorting by price
    pub rank: u32,
    pub hotel_id: String,
    pub name: String,
    pub star_rating: Option<f32>,
    pub address: String,
    /// Total price for the whole stay
    pub price: Price,
    pub refundable_tag: String,
    pub stay: Stay,
}

/// Sort offers by ascending price and assign ranks 1..n.
///
/// The sort is stable, so offers with equal prices keep provider order.
pub fn rank_offers(offers: &mut [HotelOffer]) {
    offers.sort_by(|a, b| a.price.amount.total_cmp(&b.price.amount));
    for (i, offer) in offers.iter_mut().enumerate() {
        offer.rank = u32::try_from(i + 1).unwrap_or(u32::MAX);
    }
}
