//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use std::collections::BTreeMap;

use crate::{
    CashBox, CashCount, Court, CourtTransactionKind, Currency, DateRange, ElectronicPayments,
    Money, PaymentMethod, ResultEngine, Role, util::ensure_non_negative,
};

/// Create a staff account.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub pin: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

/// Partial update of a staff account; `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub pin: Option<String>,
    pub role: Option<Role>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub active: Option<bool>,
}

/// Log a court transaction.
#[derive(Clone, Debug)]
pub struct CourtTransactionCmd {
    pub kind: CourtTransactionKind,
    pub court: Court,
    pub client_name: String,
    pub amount_usd: Money,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
    pub idempotency_key: Option<String>,
}

impl CourtTransactionCmd {
    #[must_use]
    pub fn new(
        kind: CourtTransactionKind,
        court: Court,
        client_name: impl Into<String>,
        amount_usd: Money,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            kind,
            court,
            client_name: client_name.into(),
            amount_usd,
            payment_method,
            note: None,
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Raw figures typed in by the cashier when closing a till.
///
/// Counts are keyed by face value; totals are always computed by the engine.
#[derive(Clone, Debug)]
pub struct ClosingInput {
    pub cash_box: CashBox,
    pub opening_bs: Money,
    pub opening_usd: Money,
    pub cash_bs: BTreeMap<u32, u32>,
    pub cash_usd: BTreeMap<u32, u32>,
    pub electronic: ElectronicPayments,
    pub note: Option<String>,
    pub idempotency_key: Option<String>,
}

impl ClosingInput {
    #[must_use]
    pub fn new(cash_box: CashBox) -> Self {
        Self {
            cash_box,
            opening_bs: Money::ZERO,
            opening_usd: Money::ZERO,
            cash_bs: BTreeMap::new(),
            cash_usd: BTreeMap::new(),
            electronic: ElectronicPayments::default(),
            note: None,
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn cash_bs(mut self, denomination: u32, count: u32) -> Self {
        self.cash_bs.insert(denomination, count);
        self
    }

    #[must_use]
    pub fn cash_usd(mut self, denomination: u32, count: u32) -> Self {
        self.cash_usd.insert(denomination, count);
        self
    }

    #[must_use]
    pub fn electronic(mut self, electronic: ElectronicPayments) -> Self {
        self.electronic = electronic;
        self
    }

    #[must_use]
    pub fn opening(mut self, opening_bs: Money, opening_usd: Money) -> Self {
        self.opening_bs = opening_bs;
        self.opening_usd = opening_usd;
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Rejects negative amounts and unknown denominations before anything
    /// touches the database; returns the checked cash counts.
    pub fn validate(&self) -> ResultEngine<(CashCount, CashCount)> {
        ensure_non_negative(self.opening_bs, "opening Bs")?;
        ensure_non_negative(self.opening_usd, "opening USD")?;
        for (label, amount) in self.electronic.fields() {
            ensure_non_negative(amount, label)?;
        }
        let cash_bs = CashCount::new(Currency::Ves, self.cash_bs.clone())?;
        let cash_usd = CashCount::new(Currency::Usd, self.cash_usd.clone())?;
        Ok((cash_bs, cash_usd))
    }
}

/// Selects closings for listings, exports and reports.
#[derive(Clone, Debug)]
pub struct ClosingFilter {
    pub range: DateRange,
    pub cash_box: Option<CashBox>,
    /// Cashier name, matched accent/case-insensitively.
    pub cashier: Option<String>,
}

impl ClosingFilter {
    #[must_use]
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            cash_box: None,
            cashier: None,
        }
    }

    #[must_use]
    pub fn cash_box(mut self, cash_box: CashBox) -> Self {
        self.cash_box = Some(cash_box);
        self
    }

    #[must_use]
    pub fn cashier(mut self, cashier: impl Into<String>) -> Self {
        self.cashier = Some(cashier.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;

    #[test]
    fn validation_rejects_negative_inputs() {
        let input = ClosingInput::new(CashBox::CafeBar).opening(Money::new(-1), Money::ZERO);
        assert!(matches!(input.validate(), Err(EngineError::InvalidAmount(_))));

        let input = ClosingInput::new(CashBox::CafeBar).electronic(ElectronicPayments {
            zelle_usd: Money::new(-500),
            ..ElectronicPayments::default()
        });
        assert_eq!(
            input.validate().unwrap_err(),
            EngineError::InvalidAmount("zelle must not be negative".to_string())
        );
    }

    #[test]
    fn validation_checks_denominations() {
        let input = ClosingInput::new(CashBox::PadelCourts).cash_usd(3, 1);
        assert!(matches!(input.validate(), Err(EngineError::InvalidInput(_))));

        let input = ClosingInput::new(CashBox::PadelCourts)
            .cash_bs(100, 2)
            .cash_usd(20, 1);
        let (bs, usd) = input.validate().unwrap();
        assert_eq!(bs.total(), Money::from_major(200));
        assert_eq!(usd.total(), Money::from_major(20));
    }
}
