//! Cash closings ("cierres de caja").
//!
//! A closing is written once per submission and never updated. It stores the
//! raw inputs together with the totals computed from them.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    CashCount, ClosingTotals, Currency, ElectronicPayments, EngineError, Money, Rate,
    ResultEngine, util::parse_uuid,
};

/// Physical till being closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashBox {
    /// Padel courts, shop included.
    PadelCourts,
    CafeBar,
}

impl CashBox {
    pub const ALL: [CashBox; 2] = [Self::PadelCourts, Self::CafeBar];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PadelCourts => "padel_courts",
            Self::CafeBar => "cafe_bar",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PadelCourts => "Canchas Padel (Incluye Tienda)",
            Self::CafeBar => "Cafe Bar",
        }
    }
}

impl TryFrom<&str> for CashBox {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|cash_box| cash_box.as_str() == value || cash_box.label() == value)
            .ok_or_else(|| EngineError::InvalidInput(format!("invalid cash box: {value}")))
    }
}

/// A stored closing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CashClosing {
    pub id: Uuid,
    pub cash_box: CashBox,
    pub business_date: NaiveDate,
    pub closed_at: DateTime<Utc>,
    pub recorded_by: String,
    pub cashier_name: String,
    pub rate: Rate,
    pub opening_bs: Money,
    pub opening_usd: Money,
    pub cash_bs: CashCount,
    pub cash_usd: CashCount,
    pub electronic: ElectronicPayments,
    pub totals: ClosingTotals,
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cierres_caja")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub cash_box: String,
    pub business_date: Date,
    pub closed_at: DateTimeUtc,
    pub recorded_by: String,
    pub cashier_name: String,
    pub cashier_name_norm: String,
    pub rate_scaled: i64,
    pub opening_bs: i64,
    pub opening_usd: i64,
    /// JSON object `{ "<denomination>": <count> }`.
    pub cash_bs: String,
    pub cash_usd: String,
    pub mobile_payment_bs: i64,
    pub bank_transfer_bs: i64,
    pub other_bs: i64,
    pub zelle_usd: i64,
    pub international_transfer_usd: i64,
    pub other_usd: i64,
    pub credit_collections_usd: i64,
    pub advance_payments_usd: i64,
    pub total_cash_bs: i64,
    pub total_cash_usd: i64,
    pub total_electronic_bs: i64,
    pub total_electronic_usd: i64,
    pub total_usd_gross: i64,
    pub usd_gross_in_bs: i64,
    pub total_collected_bs: i64,
    pub net_adjustments_usd: i64,
    pub discrepancy_bs: i64,
    pub note: Option<String>,
    pub idempotency_key: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn counts_to_json(count: &CashCount) -> ResultEngine<String> {
    serde_json::to_string(count.counts())
        .map_err(|err| EngineError::InvalidInput(format!("cannot encode cash count: {err}")))
}

fn counts_from_json(currency: Currency, raw: &str) -> ResultEngine<CashCount> {
    let counts: BTreeMap<u32, u32> = serde_json::from_str(raw)
        .map_err(|err| EngineError::InvalidInput(format!("invalid stored cash count: {err}")))?;
    CashCount::new(currency, counts)
}

impl CashClosing {
    pub(crate) fn to_active_model(
        &self,
        cashier_name_norm: String,
        idempotency_key: Option<String>,
    ) -> ResultEngine<ActiveModel> {
        let e = &self.electronic;
        let t = &self.totals;
        Ok(ActiveModel {
            id: ActiveValue::Set(self.id.to_string()),
            cash_box: ActiveValue::Set(self.cash_box.as_str().to_string()),
            business_date: ActiveValue::Set(self.business_date),
            closed_at: ActiveValue::Set(self.closed_at),
            recorded_by: ActiveValue::Set(self.recorded_by.clone()),
            cashier_name: ActiveValue::Set(self.cashier_name.clone()),
            cashier_name_norm: ActiveValue::Set(cashier_name_norm),
            rate_scaled: ActiveValue::Set(self.rate.scaled()),
            opening_bs: ActiveValue::Set(self.opening_bs.minor()),
            opening_usd: ActiveValue::Set(self.opening_usd.minor()),
            cash_bs: ActiveValue::Set(counts_to_json(&self.cash_bs)?),
            cash_usd: ActiveValue::Set(counts_to_json(&self.cash_usd)?),
            mobile_payment_bs: ActiveValue::Set(e.mobile_payment_bs.minor()),
            bank_transfer_bs: ActiveValue::Set(e.bank_transfer_bs.minor()),
            other_bs: ActiveValue::Set(e.other_bs.minor()),
            zelle_usd: ActiveValue::Set(e.zelle_usd.minor()),
            international_transfer_usd: ActiveValue::Set(e.international_transfer_usd.minor()),
            other_usd: ActiveValue::Set(e.other_usd.minor()),
            credit_collections_usd: ActiveValue::Set(t.credit_collections_usd.minor()),
            advance_payments_usd: ActiveValue::Set(t.advance_payments_usd.minor()),
            total_cash_bs: ActiveValue::Set(t.total_cash_bs.minor()),
            total_cash_usd: ActiveValue::Set(t.total_cash_usd.minor()),
            total_electronic_bs: ActiveValue::Set(t.total_electronic_bs.minor()),
            total_electronic_usd: ActiveValue::Set(t.total_electronic_usd.minor()),
            total_usd_gross: ActiveValue::Set(t.total_usd_gross.minor()),
            usd_gross_in_bs: ActiveValue::Set(t.usd_gross_in_bs.minor()),
            total_collected_bs: ActiveValue::Set(t.total_collected_bs.minor()),
            net_adjustments_usd: ActiveValue::Set(t.net_adjustments_usd.minor()),
            discrepancy_bs: ActiveValue::Set(t.discrepancy_bs.minor()),
            note: ActiveValue::Set(self.note.clone()),
            idempotency_key: ActiveValue::Set(idempotency_key),
        })
    }
}

impl TryFrom<Model> for CashClosing {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let m = Money::new;
        Ok(Self {
            id: parse_uuid(&model.id, "closing")?,
            cash_box: CashBox::try_from(model.cash_box.as_str())?,
            business_date: model.business_date,
            closed_at: model.closed_at,
            recorded_by: model.recorded_by,
            cashier_name: model.cashier_name,
            rate: Rate::from_scaled(model.rate_scaled)?,
            opening_bs: m(model.opening_bs),
            opening_usd: m(model.opening_usd),
            cash_bs: counts_from_json(Currency::Ves, &model.cash_bs)?,
            cash_usd: counts_from_json(Currency::Usd, &model.cash_usd)?,
            electronic: ElectronicPayments {
                mobile_payment_bs: m(model.mobile_payment_bs),
                bank_transfer_bs: m(model.bank_transfer_bs),
                other_bs: m(model.other_bs),
                zelle_usd: m(model.zelle_usd),
                international_transfer_usd: m(model.international_transfer_usd),
                other_usd: m(model.other_usd),
            },
            totals: ClosingTotals {
                total_cash_bs: m(model.total_cash_bs),
                total_cash_usd: m(model.total_cash_usd),
                total_electronic_bs: m(model.total_electronic_bs),
                total_electronic_usd: m(model.total_electronic_usd),
                total_usd_gross: m(model.total_usd_gross),
                usd_gross_in_bs: m(model.usd_gross_in_bs),
                total_collected_bs: m(model.total_collected_bs),
                credit_collections_usd: m(model.credit_collections_usd),
                advance_payments_usd: m(model.advance_payments_usd),
                net_adjustments_usd: m(model.net_adjustments_usd),
                discrepancy_bs: m(model.discrepancy_bs),
            },
            note: model.note,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_box_parses_code_and_label() {
        assert_eq!(CashBox::try_from("cafe_bar").unwrap(), CashBox::CafeBar);
        assert_eq!(
            CashBox::try_from("Canchas Padel (Incluye Tienda)").unwrap(),
            CashBox::PadelCourts
        );
        assert!(CashBox::try_from("kiosk").is_err());
    }

    #[test]
    fn counts_survive_storage_encoding() {
        let count =
            CashCount::new(Currency::Usd, [(5, 2), (100, 1)].into_iter().collect()).unwrap();
        let raw = counts_to_json(&count).unwrap();
        assert_eq!(raw, r#"{"5":2,"100":1}"#);
        assert_eq!(counts_from_json(Currency::Usd, &raw).unwrap(), count);
    }
}
