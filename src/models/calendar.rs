//! Stay date ranges and month scan windows

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{FarescanError, Result};

/// Check-in / check-out pair shared by an itinerary and its hotel offer
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl Stay {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self> {
        if check_out <= check_in {
            return Err(FarescanError::validation(format!(
                "check-out {check_out} must be after check-in {check_in}"
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn from_nights(check_in: NaiveDate, nights: u32) -> Result<Self> {
        let check_out = add_days(check_in, nights)?;
        Self::new(check_in, check_out)
    }

    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

pub(crate) fn add_days(date: NaiveDate, days: u32) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| FarescanError::validation(format!("{date} + {days} days is out of range")))
}

/// Ordered set of calendar dates considered when scanning a month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWindow {
    dates: Vec<NaiveDate>,
}

impl ScanWindow {
    /// Every date of `year-month` on or after `earliest`, ascending.
    ///
    /// Fails when the month is invalid or lies entirely before `earliest`.
    pub fn for_month(year: i32, month: u32, earliest: NaiveDate) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(FarescanError::validation(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| FarescanError::validation(format!("invalid year {year}")))?;

        let dates: Vec<NaiveDate> = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .filter(|d| *d >= earliest)
            .collect();

        if dates.is_empty() {
            return Err(FarescanError::validation(format!(
                "{year}-{month:02} is entirely in the past"
            )));
        }
        Ok(Self { dates })
    }

    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
