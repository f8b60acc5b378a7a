//! Court-rental transactions.
//!
//! Every rental, rain credit, credit redemption or advance payment on a padel
//! court is logged here in dollars. The rows are append-only.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::parse_uuid};

/// Number of padel courts on the premises.
pub const COURT_COUNT: u8 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtTransactionKind {
    /// Regular court rental paid on the spot.
    NormalRental,
    /// Credit issued when a booked rental is cancelled (e.g. rain).
    SuspensionCredit,
    /// Payment of a credit that was pending.
    CreditCollection,
    /// Payment collected in advance for a future booking.
    AdvancePayment,
}

impl CourtTransactionKind {
    pub const ALL: [CourtTransactionKind; 4] = [
        Self::NormalRental,
        Self::SuspensionCredit,
        Self::CreditCollection,
        Self::AdvancePayment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NormalRental => "normal_rental",
            Self::SuspensionCredit => "suspension_credit",
            Self::CreditCollection => "credit_collection",
            Self::AdvancePayment => "advance_payment",
        }
    }

    /// Label shown to staff.
    pub fn label(self) -> &'static str {
        match self {
            Self::NormalRental => "Alquiler Normal",
            Self::SuspensionCredit => "Crédito (por Suspensión)",
            Self::CreditCollection => "Cobro de Crédito Pendiente",
            Self::AdvancePayment => "Pago Adelantado",
        }
    }
}

impl TryFrom<&str> for CourtTransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value || kind.label() == value)
            .ok_or_else(|| {
                EngineError::InvalidInput(format!("invalid court transaction kind: {value}"))
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    PointOfSaleBs,
    MobilePaymentBs,
    CashUsd,
    ZelleUsd,
    VenmoUsd,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        Self::PointOfSaleBs,
        Self::MobilePaymentBs,
        Self::CashUsd,
        Self::ZelleUsd,
        Self::VenmoUsd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PointOfSaleBs => "point_of_sale_bs",
            Self::MobilePaymentBs => "mobile_payment_bs",
            Self::CashUsd => "cash_usd",
            Self::ZelleUsd => "zelle_usd",
            Self::VenmoUsd => "venmo_usd",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PointOfSaleBs => "Punto de Venta/Débito (Bs)",
            Self::MobilePaymentBs => "Pago Móvil (Bs)",
            Self::CashUsd => "Efectivo (USD)",
            Self::ZelleUsd => "Zelle (USD)",
            Self::VenmoUsd => "Venmo (USD)",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == value || method.label() == value)
            .ok_or_else(|| EngineError::InvalidInput(format!("invalid payment method: {value}")))
    }
}

/// A padel court, numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Court(u8);

impl Court {
    pub fn new(number: u8) -> ResultEngine<Self> {
        if (1..=COURT_COUNT).contains(&number) {
            Ok(Self(number))
        } else {
            Err(EngineError::InvalidInput(format!(
                "court must be between 1 and {COURT_COUNT}, got {number}"
            )))
        }
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn label(self) -> String {
        format!("Cancha {}", self.0)
    }
}

impl TryFrom<u8> for Court {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Court> for u8 {
    fn from(value: Court) -> Self {
        value.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtTransaction {
    pub id: Uuid,
    pub kind: CourtTransactionKind,
    pub court: Court,
    pub client_name: String,
    pub amount_usd: Money,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub recorded_by: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transacciones_canchas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub court: i16,
    pub client_name: String,
    pub amount_usd_minor: i64,
    pub payment_method: String,
    pub note: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub recorded_by: String,
    pub idempotency_key: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl CourtTransaction {
    pub(crate) fn into_active_model(self, idempotency_key: Option<String>) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id.to_string()),
            kind: ActiveValue::Set(self.kind.as_str().to_string()),
            court: ActiveValue::Set(i16::from(self.court.number())),
            client_name: ActiveValue::Set(self.client_name),
            amount_usd_minor: ActiveValue::Set(self.amount_usd.minor()),
            payment_method: ActiveValue::Set(self.payment_method.as_str().to_string()),
            note: ActiveValue::Set(self.note),
            occurred_at: ActiveValue::Set(self.occurred_at),
            recorded_by: ActiveValue::Set(self.recorded_by),
            idempotency_key: ActiveValue::Set(idempotency_key),
        }
    }
}

impl TryFrom<Model> for CourtTransaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let court = u8::try_from(model.court)
            .map_err(|_| EngineError::InvalidInput(format!("invalid court: {}", model.court)))?;
        Ok(Self {
            id: parse_uuid(&model.id, "court transaction")?,
            kind: CourtTransactionKind::try_from(model.kind.as_str())?,
            court: Court::new(court)?,
            client_name: model.client_name,
            amount_usd: Money::new(model.amount_usd_minor),
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            note: model.note,
            occurred_at: model.occurred_at,
            recorded_by: model.recorded_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_code_or_label() {
        for kind in CourtTransactionKind::ALL {
            assert_eq!(CourtTransactionKind::try_from(kind.as_str()).unwrap(), kind);
            assert_eq!(CourtTransactionKind::try_from(kind.label()).unwrap(), kind);
        }
        assert_eq!(
            CourtTransactionKind::try_from("Cobro de Crédito Pendiente").unwrap(),
            CourtTransactionKind::CreditCollection
        );
        assert!(CourtTransactionKind::try_from("refund").is_err());
    }

    #[test]
    fn court_numbers_are_bounded() {
        assert!(Court::new(0).is_err());
        assert_eq!(Court::new(4).unwrap().label(), "Cancha 4");
        assert!(Court::new(5).is_err());
    }
}
