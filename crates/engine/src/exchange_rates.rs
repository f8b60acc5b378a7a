//! Bs/USD exchange rates.
//!
//! Rates are append-only: the most recent row by `recorded_at` is the current
//! rate used by new closings.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, util::parse_uuid};

/// Bolívares per US dollar, as a fixed-point number with four fraction
/// digits (`36.5` is stored as `365000`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(i64);

impl Rate {
    /// Fixed-point scale of the stored value.
    pub const SCALE: i64 = 10_000;
    const FRACTION_DIGITS: usize = 4;
    /// Upper bound accepted from user input (one million Bs per dollar).
    pub const MAX: Rate = Rate(1_000_000 * Self::SCALE);

    /// Builds a rate from its scaled representation, rejecting values that are
    /// not strictly positive.
    pub fn from_scaled(scaled: i64) -> Result<Self, EngineError> {
        if scaled <= 0 {
            return Err(EngineError::InvalidRate(
                "the rate must be a positive value".to_string(),
            ));
        }
        if scaled > Self::MAX.0 {
            return Err(EngineError::InvalidRate("rate too large".to_string()));
        }
        Ok(Self(scaled))
    }

    /// Returns the scaled value (`rate × 10_000`).
    #[must_use]
    pub const fn scaled(self) -> i64 {
        self.0
    }

    /// Converts a dollar amount into bolívares, rounding half away from zero
    /// to the céntimo.
    #[must_use]
    pub fn usd_to_bs(self, usd: Money) -> Money {
        let product = i128::from(usd.minor()) * i128::from(self.0);
        let scale = i128::from(Self::SCALE);
        let half = scale / 2;
        let rounded = if product >= 0 {
            (product + half) / scale
        } else {
            (product - half) / scale
        };
        Money::saturating_from_i128(rounded)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::SCALE;
        let frac = self.0 % Self::SCALE;
        write!(f, "{whole}.{frac:04}")
    }
}

impl FromStr for Rate {
    type Err = EngineError;

    /// Parses `36`, `36.5` or `36,5012`; at most four fraction digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidRate(format!("invalid rate: {}", s.trim()));

        let normalized = s.trim().replace(',', ".");
        let (whole, frac) = match normalized.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (normalized.as_str(), ""),
        };
        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > Self::FRACTION_DIGITS {
            return Err(EngineError::InvalidRate("too many decimals".to_string()));
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let padded = format!("{frac:0<width$}", width = Self::FRACTION_DIGITS);
        let frac: i64 = padded.parse().map_err(|_| invalid())?;

        let scaled = whole
            .checked_mul(Self::SCALE)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(|| EngineError::InvalidRate("rate too large".to_string()))?;
        Self::from_scaled(scaled)
    }
}

/// A recorded exchange rate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub id: Uuid,
    pub rate: Rate,
    pub recorded_at: DateTime<Utc>,
    pub recorded_by: String,
}

impl ExchangeRate {
    pub fn new(rate: Rate, recorded_at: DateTime<Utc>, recorded_by: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            rate,
            recorded_at,
            recorded_by,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasas_cambio")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub recorded_at: DateTimeUtc,
    pub rate_scaled: i64,
    pub recorded_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ExchangeRate> for ActiveModel {
    fn from(value: &ExchangeRate) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            recorded_at: ActiveValue::Set(value.recorded_at),
            rate_scaled: ActiveValue::Set(value.rate.scaled()),
            recorded_by: ActiveValue::Set(value.recorded_by.clone()),
        }
    }
}

impl TryFrom<Model> for ExchangeRate {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "exchange rate")?,
            rate: Rate::from_scaled(model.rate_scaled)?,
            recorded_at: model.recorded_at,
            recorded_by: model.recorded_by,
        })
    }
}
