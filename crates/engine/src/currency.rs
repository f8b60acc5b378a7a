use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

/// Bolívar notes accepted at the till, in major units.
pub const DENOMINATIONS_BS: [u32; 6] = [10, 20, 50, 100, 200, 500];

/// US dollar notes accepted at the till, in major units.
pub const DENOMINATIONS_USD: [u32; 6] = [1, 5, 10, 20, 50, 100];

/// Currencies handled by the tills.
///
/// The business prices in dollars but collects in both currencies, so every
/// closing carries amounts in `Ves` (bolívar) and `Usd`.
///
/// ## Minor units
///
/// Both currencies are stored as an `i64` number of **minor units** (see
/// `Money`), two fraction digits each: `12.50 USD` ⇄ `1250`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Ves,
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Ves => "VES",
            Currency::Usd => "USD",
        }
    }

    /// Cash denominations counted at closing time, smallest first.
    #[must_use]
    pub const fn denominations(self) -> &'static [u32] {
        match self {
            Currency::Ves => &DENOMINATIONS_BS,
            Currency::Usd => &DENOMINATIONS_USD,
        }
    }

    /// Formats an amount with the currency symbol, e.g. `Bs 1234.50` or
    /// `$12.00`.
    #[must_use]
    pub fn format(self, amount: Money) -> String {
        match self {
            Currency::Ves => format!("Bs {amount}"),
            Currency::Usd if amount.is_negative() => format!("-${}", -amount),
            Currency::Usd => format!("${amount}"),
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "VES" | "BS" => Ok(Currency::Ves),
            "USD" => Ok(Currency::Usd),
            other => Err(EngineError::InvalidInput(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_uses_symbol() {
        assert_eq!(Currency::Ves.format(Money::new(123_450)), "Bs 1234.50");
        assert_eq!(Currency::Usd.format(Money::new(1200)), "$12.00");
        assert_eq!(Currency::Usd.format(Money::new(-50)), "-$0.50");
    }

    #[test]
    fn parse_accepts_bs_alias() {
        assert_eq!(Currency::try_from("bs").unwrap(), Currency::Ves);
        assert_eq!(Currency::try_from(" usd ").unwrap(), Currency::Usd);
        assert!(Currency::try_from("EUR").is_err());
    }
}
