//! Closing-totals calculator.
//!
//! [`calculate_closing_totals`] is a pure function of the counted cash, the
//! electronic payments, the court adjustments and the exchange rate. The
//! engine runs it once when a closing is submitted and stores the result next
//! to the inputs, so a stored closing can always be re-derived.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CourtSummary, Currency, EngineError, Money, Rate, ResultEngine};

/// Upper bound for a single denomination count.
pub const MAX_NOTE_COUNT: u32 = 1_000_000;

/// Note counts for one currency, keyed by face value.
///
/// Only the denominations of the currency are accepted; missing ones count as
/// zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CashCount {
    currency: Currency,
    counts: BTreeMap<u32, u32>,
}

impl CashCount {
    pub fn new(currency: Currency, counts: BTreeMap<u32, u32>) -> ResultEngine<Self> {
        let allowed = currency.denominations();
        for (&denomination, &count) in &counts {
            if !allowed.contains(&denomination) {
                return Err(EngineError::InvalidInput(format!(
                    "{denomination} is not a {} denomination",
                    currency.code()
                )));
            }
            if count > MAX_NOTE_COUNT {
                return Err(EngineError::InvalidInput(format!(
                    "too many {denomination} {} notes",
                    currency.code()
                )));
            }
        }
        let counts = counts.into_iter().filter(|(_, count)| *count > 0).collect();
        Ok(Self { currency, counts })
    }

    /// An empty drawer.
    #[must_use]
    pub fn empty(currency: Currency) -> Self {
        Self {
            currency,
            counts: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Count for one denomination (zero when absent).
    #[must_use]
    pub fn count(&self, denomination: u32) -> u32 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    /// Non-zero counts, smallest denomination first.
    pub fn counts(&self) -> &BTreeMap<u32, u32> {
        &self.counts
    }

    /// Σ denomination × count, in minor units.
    #[must_use]
    pub fn total(&self) -> Money {
        let total: i128 = self
            .counts
            .iter()
            .map(|(&denomination, &count)| i128::from(denomination) * i128::from(count) * 100)
            .sum();
        Money::saturating_from_i128(total)
    }
}

/// Non-cash payments received by the till.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectronicPayments {
    pub mobile_payment_bs: Money,
    pub bank_transfer_bs: Money,
    pub other_bs: Money,
    pub zelle_usd: Money,
    pub international_transfer_usd: Money,
    pub other_usd: Money,
}

impl ElectronicPayments {
    #[must_use]
    pub fn total_bs(&self) -> Money {
        self.mobile_payment_bs
            .saturating_add(self.bank_transfer_bs)
            .saturating_add(self.other_bs)
    }

    #[must_use]
    pub fn total_usd(&self) -> Money {
        self.zelle_usd
            .saturating_add(self.international_transfer_usd)
            .saturating_add(self.other_usd)
    }

    pub(crate) fn fields(&self) -> [(&'static str, Money); 6] {
        [
            ("mobile payment", self.mobile_payment_bs),
            ("bank transfer (Bs)", self.bank_transfer_bs),
            ("other (Bs)", self.other_bs),
            ("zelle", self.zelle_usd),
            ("international transfer (USD)", self.international_transfer_usd),
            ("other (USD)", self.other_usd),
        ]
    }
}

/// Court-transaction totals of the closing's business day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustments {
    pub credit_collections_usd: Money,
    pub advance_payments_usd: Money,
}

impl From<&CourtSummary> for Adjustments {
    fn from(summary: &CourtSummary) -> Self {
        Self {
            credit_collections_usd: summary.credit_collected_usd,
            advance_payments_usd: summary.advance_suspended_usd,
        }
    }
}

/// Derived figures of a closing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingTotals {
    pub total_cash_bs: Money,
    pub total_cash_usd: Money,
    pub total_electronic_bs: Money,
    pub total_electronic_usd: Money,
    pub total_usd_gross: Money,
    /// `total_usd_gross` converted at the closing rate.
    pub usd_gross_in_bs: Money,
    pub total_collected_bs: Money,
    pub credit_collections_usd: Money,
    pub advance_payments_usd: Money,
    pub net_adjustments_usd: Money,
    /// Difference against the point-of-sale sales of the day.
    ///
    /// There is no sales feed to compare against yet, so this is always zero.
    pub discrepancy_bs: Money,
}

/// Computes the totals of one closing.
///
/// ```text
/// total_cash_bs        = Σ denomination × count (Bs)
/// total_cash_usd       = Σ denomination × count (USD)
/// total_electronic_bs  = mobile + transfer + other (Bs)
/// total_electronic_usd = zelle + international transfer + other (USD)
/// total_usd_gross      = total_cash_usd + total_electronic_usd
/// total_collected_bs   = total_cash_bs + total_electronic_bs + total_usd_gross × rate
/// net_adjustments_usd  = credit collections + advance payments
/// ```
#[must_use]
pub fn calculate_closing_totals(
    rate: Rate,
    cash_bs: &CashCount,
    cash_usd: &CashCount,
    electronic: &ElectronicPayments,
    adjustments: Adjustments,
) -> ClosingTotals {
    let total_cash_bs = cash_bs.total();
    let total_cash_usd = cash_usd.total();
    let total_electronic_bs = electronic.total_bs();
    let total_electronic_usd = electronic.total_usd();
    let total_usd_gross = total_cash_usd.saturating_add(total_electronic_usd);
    let usd_gross_in_bs = rate.usd_to_bs(total_usd_gross);
    let total_collected_bs = total_cash_bs
        .saturating_add(total_electronic_bs)
        .saturating_add(usd_gross_in_bs);

    ClosingTotals {
        total_cash_bs,
        total_cash_usd,
        total_electronic_bs,
        total_electronic_usd,
        total_usd_gross,
        usd_gross_in_bs,
        total_collected_bs,
        credit_collections_usd: adjustments.credit_collections_usd,
        advance_payments_usd: adjustments.advance_payments_usd,
        net_adjustments_usd: adjustments
            .credit_collections_usd
            .saturating_add(adjustments.advance_payments_usd),
        discrepancy_bs: Money::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(currency: Currency, pairs: &[(u32, u32)]) -> CashCount {
        CashCount::new(currency, pairs.iter().copied().collect()).unwrap()
    }

    fn rate(value: &str) -> Rate {
        value.parse().unwrap()
    }

    #[test]
    fn worked_example() {
        let bs = count(Currency::Ves, &[(10, 3), (20, 1)]);
        let usd = count(Currency::Usd, &[(1, 5)]);
        let totals = calculate_closing_totals(
            rate("40"),
            &bs,
            &usd,
            &ElectronicPayments::default(),
            Adjustments::default(),
        );
        assert_eq!(totals.total_cash_bs, Money::from_major(50));
        assert_eq!(totals.total_usd_gross, Money::from_major(5));
        assert_eq!(totals.total_collected_bs, Money::from_major(250));
        assert_eq!(totals.discrepancy_bs, Money::ZERO);
    }

    #[test]
    fn electronic_and_adjustments_are_summed() {
        let electronic = ElectronicPayments {
            mobile_payment_bs: Money::from_major(100),
            bank_transfer_bs: Money::from_major(30),
            other_bs: Money::new(50),
            zelle_usd: Money::from_major(10),
            international_transfer_usd: Money::from_major(2),
            other_usd: Money::new(25),
        };
        let adjustments = Adjustments {
            credit_collections_usd: Money::from_major(10),
            advance_payments_usd: Money::from_major(5),
        };
        let totals = calculate_closing_totals(
            rate("10"),
            &CashCount::empty(Currency::Ves),
            &count(Currency::Usd, &[(20, 1)]),
            &electronic,
            adjustments,
        );
        assert_eq!(totals.total_electronic_bs, Money::new(13_050));
        assert_eq!(totals.total_electronic_usd, Money::new(1_225));
        assert_eq!(totals.total_usd_gross, Money::new(3_225));
        // 130.50 + 32.25 × 10
        assert_eq!(totals.total_collected_bs, Money::new(13_050 + 32_250));
        assert_eq!(totals.net_adjustments_usd, Money::from_major(15));
    }

    #[test]
    fn cash_total_is_sum_of_products_and_monotonic() {
        let base: Vec<(u32, u32)> = crate::DENOMINATIONS_BS.iter().map(|&d| (d, 2)).collect();
        let drawer = count(Currency::Ves, &base);
        let expected: i64 = crate::DENOMINATIONS_BS.iter().map(|&d| i64::from(d) * 2 * 100).sum();
        assert_eq!(drawer.total(), Money::new(expected));

        for &denomination in &crate::DENOMINATIONS_BS {
            let bumped: Vec<(u32, u32)> = base
                .iter()
                .map(|&(d, c)| if d == denomination { (d, c + 1) } else { (d, c) })
                .collect();
            assert!(count(Currency::Ves, &bumped).total() > drawer.total());
        }
    }

    #[test]
    fn collected_is_linear_in_rate() {
        let bs = count(Currency::Ves, &[(50, 2), (500, 1)]);
        let usd = count(Currency::Usd, &[(5, 3), (100, 1)]);
        let electronic = ElectronicPayments {
            mobile_payment_bs: Money::from_major(20),
            zelle_usd: Money::from_major(7),
            ..ElectronicPayments::default()
        };
        let single = calculate_closing_totals(rate("36.5"), &bs, &usd, &electronic, Adjustments::default());
        let double = calculate_closing_totals(rate("73"), &bs, &usd, &electronic, Adjustments::default());

        let bs_part = single.total_cash_bs + single.total_electronic_bs;
        assert_eq!(double.total_cash_bs + double.total_electronic_bs, bs_part);
        assert_eq!(double.usd_gross_in_bs.minor(), single.usd_gross_in_bs.minor() * 2);
        assert_eq!(
            double.total_collected_bs - bs_part,
            (single.total_collected_bs - bs_part) + (single.total_collected_bs - bs_part)
        );
    }

    #[test]
    fn rejects_foreign_denominations() {
        let err = CashCount::new(Currency::Usd, [(2, 1)].into_iter().collect()).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidInput("2 is not a USD denomination".to_string())
        );
        assert!(CashCount::new(Currency::Ves, [(10, MAX_NOTE_COUNT + 1)].into_iter().collect()).is_err());
    }

    #[test]
    fn zero_counts_are_dropped() {
        let drawer = count(Currency::Ves, &[(10, 0), (20, 4)]);
        assert_eq!(drawer.counts().len(), 1);
        assert_eq!(drawer.count(10), 0);
        assert_eq!(drawer.count(20), 4);
    }
}
