use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::HotelSource;
use crate::models::{HotelFilters, HotelOffer, HotelQuery, ScanWindow, Stay, rank_offers};
use crate::{FarescanError, Result};

/// Cheapest stay of a month plus the per-date minima it was chosen from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyHotelScan {
    pub cheapest: HotelOffer,
    pub daily: Vec<HotelOffer>,
}

pub struct HotelLookup {
    source: Arc<dyn HotelSource>,
}

impl HotelLookup {
    pub fn new(source: Arc<dyn HotelSource>) -> Self {
        Self { source }
    }

    /// All offers for the stay, cheapest first. An empty answer is a no-results error.
    #[instrument(name = "hotel_lookup", skip(self, query), fields(city = %query.city, check_in = %query.stay.check_in))]
    pub async fn offers(&self, query: &HotelQuery) -> Result<Vec<HotelOffer>> {
        let mut offers = self.source.search_offers(query).await?;
        if offers.is_empty() {
            return Err(FarescanError::no_results(format!(
                "No hotel offers found in {} for {} to {}",
                query.city, query.stay.check_in, query.stay.check_out
            )));
        }
        rank_offers(&mut offers);
        debug!("Cheapest of {} offers: {}", offers.len(), offers[0].price.format());
        Ok(offers)
    }

    pub async fn cheapest(&self, query: &HotelQuery) -> Result<HotelOffer> {
        let offers = self.offers(query).await?;
        offers
            .into_iter()
            .next()
            .ok_or_else(|| FarescanError::no_results("No hotel offers found"))
    }

    /// Cheapest `nights`-long stay checking in on any date of `window`.
    ///
    /// Dates whose lookup fails or comes back empty are skipped.
    #[instrument(name = "hotel_month_scan", skip(self, filters, window), fields(city = %filters.city, dates = window.len()))]
    pub async fn cheapest_in_window(
        &self,
        filters: &HotelFilters,
        window: &ScanWindow,
        nights: u32,
    ) -> Result<MonthlyHotelScan> {
        let mut daily: Vec<HotelOffer> = Vec::new();

        for &check_in in window.dates() {
            let query = filters.for_stay(Stay::from_nights(check_in, nights)?);
            match self.cheapest(&query).await {
                Ok(offer) => daily.push(offer),
                Err(e) => warn!("{}: hotel lookup skipped: {}", check_in, e),
            }
        }

        let cheapest = daily
            .iter()
            .fold(None::<&HotelOffer>, |best, offer| match best {
                Some(best) if best.price.amount <= offer.price.amount => Some(best),
                _ => Some(offer),
            })
            .cloned()
            .ok_or_else(|| {
                FarescanError::no_results(format!(
                    "No hotel offers found in {} for any check-in date",
                    filters.city
                ))
            })?;

        info!(
            "Cheapest stay {} from {} ({} of {} dates priced)",
            cheapest.price.format(),
            cheapest.stay.check_in,
            daily.len(),
            window.len()
        );
        Ok(MonthlyHotelScan { cheapest, daily })
    }
}
