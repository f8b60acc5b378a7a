//! Per-cashier performance figures over a set of closings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CashClosing, Money, util::normalize_name_key};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashierKpi {
    /// Name as written on the first closing of the group.
    pub cashier_name: String,
    pub closings: usize,
    pub total_collected_bs: Money,
    pub mean_abs_discrepancy_bs: Money,
    pub mean_discrepancy_bs: Money,
    pub min_discrepancy_bs: Money,
    pub max_discrepancy_bs: Money,
    /// Mean absolute discrepancy as a percentage of the mean collection per
    /// closing; `0.0` when nothing was collected.
    pub error_percentage: f64,
}

#[derive(Default)]
struct Accumulator {
    display_name: String,
    closings: usize,
    collected: i128,
    abs_discrepancy: i128,
    discrepancy: i128,
    min: Option<Money>,
    max: Option<Money>,
}

/// Groups closings by cashier name (accent/case-insensitive) and computes the
/// figures of each group, ordered by grouping key.
#[must_use]
pub fn cashier_kpis<'a, I>(closings: I) -> Vec<CashierKpi>
where
    I: IntoIterator<Item = &'a CashClosing>,
{
    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();

    for closing in closings {
        let key = normalize_name_key(&closing.cashier_name);
        let acc = groups.entry(key).or_default();
        if acc.closings == 0 {
            acc.display_name = closing.cashier_name.trim().to_string();
        }
        let discrepancy = closing.totals.discrepancy_bs;
        acc.closings += 1;
        acc.collected += i128::from(closing.totals.total_collected_bs.minor());
        acc.discrepancy += i128::from(discrepancy.minor());
        acc.abs_discrepancy += i128::from(discrepancy.minor()).abs();
        acc.min = Some(acc.min.map_or(discrepancy, |m| m.min(discrepancy)));
        acc.max = Some(acc.max.map_or(discrepancy, |m| m.max(discrepancy)));
    }

    groups.into_values().map(Accumulator::finish).collect()
}

/// Integer division rounding half away from zero; `den` must be positive.
fn div_round(num: i128, den: i128) -> i128 {
    let quotient = num / den;
    let remainder = num % den;
    if remainder.abs() * 2 >= den {
        quotient + num.signum()
    } else {
        quotient
    }
}

impl Accumulator {
    fn finish(self) -> CashierKpi {
        let n = i128::try_from(self.closings).unwrap_or(i128::MAX).max(1);
        let mean_abs = div_round(self.abs_discrepancy, n);
        // mean |d| / mean collected, with the common count cancelled out
        let error_percentage = if self.collected > 0 {
            (self.abs_discrepancy as f64 / self.collected as f64) * 100.0
        } else {
            0.0
        };

        CashierKpi {
            cashier_name: self.display_name,
            closings: self.closings,
            total_collected_bs: Money::saturating_from_i128(self.collected),
            mean_abs_discrepancy_bs: Money::saturating_from_i128(mean_abs),
            mean_discrepancy_bs: Money::saturating_from_i128(div_round(self.discrepancy, n)),
            min_discrepancy_bs: self.min.unwrap_or(Money::ZERO),
            max_discrepancy_bs: self.max.unwrap_or(Money::ZERO),
            error_percentage,
        }
    }
}
