use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both defaulting to the current business
/// day.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Role {
        Cashier,
        Supervisor,
        Admin,
        Developer,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub username: String,
        pub pin: String,
        pub role: Role,
        pub first_name: String,
        pub last_name: String,
    }

    /// Partial update; absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserPatch {
        pub pin: Option<String>,
        pub role: Option<Role>,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub first_name: String,
        pub last_name: String,
        pub role: Role,
        pub active: bool,
        pub created_at: DateTime<Utc>,
    }

    /// The authenticated caller.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Me {
        pub username: String,
        pub display_name: String,
        pub role: Role,
    }
}

pub mod rate {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RateNew {
        /// Bs per USD as a decimal string, e.g. `"36.50"`.
        pub rate: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RateView {
        pub id: Uuid,
        pub rate: String,
        pub recorded_at: DateTime<Utc>,
        pub recorded_by: String,
    }
}

pub mod court {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CourtTransactionKind {
        NormalRental,
        SuspensionCredit,
        CreditCollection,
        AdvancePayment,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        PointOfSaleBs,
        MobilePaymentBs,
        CashUsd,
        ZelleUsd,
        VenmoUsd,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CourtTransactionNew {
        pub kind: CourtTransactionKind,
        /// Court number, 1 to 4.
        pub court: u8,
        pub client_name: String,
        pub amount_usd_minor: i64,
        pub payment_method: PaymentMethod,
        pub note: Option<String>,
        pub idempotency_key: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CourtTransactionView {
        pub id: Uuid,
        pub kind: CourtTransactionKind,
        pub court: u8,
        pub client_name: String,
        pub amount_usd_minor: i64,
        pub payment_method: PaymentMethod,
        pub note: Option<String>,
        pub occurred_at: DateTime<Utc>,
        pub recorded_by: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CourtSummaryView {
        pub credit_collected_usd_minor: i64,
        pub advance_suspended_usd_minor: i64,
        pub excluded_usd_minor: i64,
        pub transactions: u64,
    }
}

pub mod closing {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CashBox {
        PadelCourts,
        CafeBar,
    }

    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ElectronicPayments {
        pub mobile_payment_bs_minor: i64,
        pub bank_transfer_bs_minor: i64,
        pub other_bs_minor: i64,
        pub zelle_usd_minor: i64,
        pub international_transfer_usd_minor: i64,
        pub other_usd_minor: i64,
    }

    /// Raw closing form. Counts are keyed by face value.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClosingNew {
        pub cash_box: CashBox,
        #[serde(default)]
        pub opening_bs_minor: i64,
        #[serde(default)]
        pub opening_usd_minor: i64,
        #[serde(default)]
        pub cash_bs: BTreeMap<u32, u32>,
        #[serde(default)]
        pub cash_usd: BTreeMap<u32, u32>,
        #[serde(default)]
        pub electronic: ElectronicPayments,
        pub note: Option<String>,
        pub idempotency_key: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClosingTotalsView {
        pub total_cash_bs_minor: i64,
        pub total_cash_usd_minor: i64,
        pub total_electronic_bs_minor: i64,
        pub total_electronic_usd_minor: i64,
        pub total_usd_gross_minor: i64,
        pub usd_gross_in_bs_minor: i64,
        pub total_collected_bs_minor: i64,
        pub credit_collections_usd_minor: i64,
        pub advance_payments_usd_minor: i64,
        pub net_adjustments_usd_minor: i64,
        pub discrepancy_bs_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClosingPreviewView {
        pub business_date: NaiveDate,
        pub rate: String,
        pub court_summary: super::court::CourtSummaryView,
        pub totals: ClosingTotalsView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClosingView {
        pub id: Uuid,
        pub cash_box: CashBox,
        pub business_date: NaiveDate,
        pub closed_at: DateTime<Utc>,
        pub recorded_by: String,
        pub cashier_name: String,
        pub rate: String,
        pub opening_bs_minor: i64,
        pub opening_usd_minor: i64,
        pub cash_bs: BTreeMap<u32, u32>,
        pub cash_usd: BTreeMap<u32, u32>,
        pub electronic: ElectronicPayments,
        pub totals: ClosingTotalsView,
        pub note: Option<String>,
    }

    /// `RangeQuery` plus optional cash box and cashier name.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ClosingQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub cash_box: Option<CashBox>,
        pub cashier: Option<String>,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashierKpiView {
        pub cashier_name: String,
        pub closings: u64,
        pub total_collected_bs_minor: i64,
        pub mean_abs_discrepancy_bs_minor: i64,
        pub mean_discrepancy_bs_minor: i64,
        pub min_discrepancy_bs_minor: i64,
        pub max_discrepancy_bs_minor: i64,
        pub error_percentage: f64,
    }
}
