//! Business days and date ranges.
//!
//! A timestamp belongs to the calendar day of the business timezone, not of
//! UTC: a sale at 21:00 in Caracas is still "today" even though it is already
//! tomorrow in UTC.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Inclusive range of business days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting `from > to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> ResultEngine<Self> {
        if from > to {
            return Err(EngineError::InvalidInput(format!(
                "invalid range: {from} is after {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// A range covering exactly one day.
    #[must_use]
    pub fn day(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
        }
    }

    /// Half-open UTC interval `[from 00:00, to+1 00:00)` in the given
    /// timezone.
    pub fn utc_bounds(&self, tz: Tz) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
        let end_day = self
            .to
            .checked_add_days(Days::new(1))
            .ok_or_else(|| EngineError::InvalidInput("date out of range".to_string()))?;
        Ok((start_of_day(tz, self.from)?, start_of_day(tz, end_day)?))
    }
}

/// Business day a timestamp falls on.
#[must_use]
pub fn business_date(tz: Tz, at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

fn start_of_day(tz: Tz, date: NaiveDate) -> ResultEngine<DateTime<Utc>> {
    // Midnight may be skipped or repeated by a DST change.
    let local = date.and_time(NaiveTime::MIN);
    let resolved = tz.from_local_datetime(&local);
    resolved
        .earliest()
        .or_else(|| resolved.latest())
        .or_else(|| {
            local
                .checked_add_signed(chrono::TimeDelta::hours(1))
                .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
        })
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| EngineError::InvalidInput(format!("cannot resolve start of {date}")))
}
