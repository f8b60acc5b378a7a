//! Mapping between engine types and the JSON shapes of `api_types`.

use api_types::{
    closing::{self as api_closing, ClosingPreviewView, ClosingTotalsView, ClosingView},
    court::{self as api_court, CourtSummaryView, CourtTransactionView},
    rate::RateView,
    report::CashierKpiView,
    user::{self as api_user, UserView},
};
use engine::{
    CashBox, CashClosing, CashierKpi, ClosingPreview, ClosingTotals, CourtSummary,
    CourtTransaction, CourtTransactionKind, ElectronicPayments, ExchangeRate, Money,
    PaymentMethod, Role, User,
};

pub(crate) fn role_to_api(role: Role) -> api_user::Role {
    match role {
        Role::Cashier => api_user::Role::Cashier,
        Role::Supervisor => api_user::Role::Supervisor,
        Role::Admin => api_user::Role::Admin,
        Role::Developer => api_user::Role::Developer,
    }
}

pub(crate) fn role_from_api(role: api_user::Role) -> Role {
    match role {
        api_user::Role::Cashier => Role::Cashier,
        api_user::Role::Supervisor => Role::Supervisor,
        api_user::Role::Admin => Role::Admin,
        api_user::Role::Developer => Role::Developer,
    }
}

pub(crate) fn cash_box_to_api(cash_box: CashBox) -> api_closing::CashBox {
    match cash_box {
        CashBox::PadelCourts => api_closing::CashBox::PadelCourts,
        CashBox::CafeBar => api_closing::CashBox::CafeBar,
    }
}

pub(crate) fn cash_box_from_api(cash_box: api_closing::CashBox) -> CashBox {
    match cash_box {
        api_closing::CashBox::PadelCourts => CashBox::PadelCourts,
        api_closing::CashBox::CafeBar => CashBox::CafeBar,
    }
}

pub(crate) fn kind_to_api(kind: CourtTransactionKind) -> api_court::CourtTransactionKind {
    match kind {
        CourtTransactionKind::NormalRental => api_court::CourtTransactionKind::NormalRental,
        CourtTransactionKind::SuspensionCredit => api_court::CourtTransactionKind::SuspensionCredit,
        CourtTransactionKind::CreditCollection => api_court::CourtTransactionKind::CreditCollection,
        CourtTransactionKind::AdvancePayment => api_court::CourtTransactionKind::AdvancePayment,
    }
}

pub(crate) fn kind_from_api(kind: api_court::CourtTransactionKind) -> CourtTransactionKind {
    match kind {
        api_court::CourtTransactionKind::NormalRental => CourtTransactionKind::NormalRental,
        api_court::CourtTransactionKind::SuspensionCredit => CourtTransactionKind::SuspensionCredit,
        api_court::CourtTransactionKind::CreditCollection => CourtTransactionKind::CreditCollection,
        api_court::CourtTransactionKind::AdvancePayment => CourtTransactionKind::AdvancePayment,
    }
}

pub(crate) fn method_to_api(method: PaymentMethod) -> api_court::PaymentMethod {
    match method {
        PaymentMethod::PointOfSaleBs => api_court::PaymentMethod::PointOfSaleBs,
        PaymentMethod::MobilePaymentBs => api_court::PaymentMethod::MobilePaymentBs,
        PaymentMethod::CashUsd => api_court::PaymentMethod::CashUsd,
        PaymentMethod::ZelleUsd => api_court::PaymentMethod::ZelleUsd,
        PaymentMethod::VenmoUsd => api_court::PaymentMethod::VenmoUsd,
    }
}

pub(crate) fn method_from_api(method: api_court::PaymentMethod) -> PaymentMethod {
    match method {
        api_court::PaymentMethod::PointOfSaleBs => PaymentMethod::PointOfSaleBs,
        api_court::PaymentMethod::MobilePaymentBs => PaymentMethod::MobilePaymentBs,
        api_court::PaymentMethod::CashUsd => PaymentMethod::CashUsd,
        api_court::PaymentMethod::ZelleUsd => PaymentMethod::ZelleUsd,
        api_court::PaymentMethod::VenmoUsd => PaymentMethod::VenmoUsd,
    }
}

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        role: role_to_api(user.role),
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        active: user.active,
        created_at: user.created_at,
    }
}

pub(crate) fn rate_view(rate: ExchangeRate) -> RateView {
    RateView {
        id: rate.id,
        rate: rate.rate.to_string(),
        recorded_at: rate.recorded_at,
        recorded_by: rate.recorded_by,
    }
}

pub(crate) fn court_transaction_view(tx: CourtTransaction) -> CourtTransactionView {
    CourtTransactionView {
        id: tx.id,
        kind: kind_to_api(tx.kind),
        court: tx.court.number(),
        client_name: tx.client_name,
        amount_usd_minor: tx.amount_usd.minor(),
        payment_method: method_to_api(tx.payment_method),
        note: tx.note,
        occurred_at: tx.occurred_at,
        recorded_by: tx.recorded_by,
    }
}

pub(crate) fn court_summary_view(summary: &CourtSummary) -> CourtSummaryView {
    CourtSummaryView {
        credit_collected_usd_minor: summary.credit_collected_usd.minor(),
        advance_suspended_usd_minor: summary.advance_suspended_usd.minor(),
        excluded_usd_minor: summary.excluded_usd.minor(),
        transactions: u64::try_from(summary.transactions).unwrap_or(u64::MAX),
    }
}

pub(crate) fn electronic_from_api(payload: &api_closing::ElectronicPayments) -> ElectronicPayments {
    ElectronicPayments {
        mobile_payment_bs: Money::new(payload.mobile_payment_bs_minor),
        bank_transfer_bs: Money::new(payload.bank_transfer_bs_minor),
        other_bs: Money::new(payload.other_bs_minor),
        zelle_usd: Money::new(payload.zelle_usd_minor),
        international_transfer_usd: Money::new(payload.international_transfer_usd_minor),
        other_usd: Money::new(payload.other_usd_minor),
    }
}

fn electronic_to_api(electronic: &ElectronicPayments) -> api_closing::ElectronicPayments {
    api_closing::ElectronicPayments {
        mobile_payment_bs_minor: electronic.mobile_payment_bs.minor(),
        bank_transfer_bs_minor: electronic.bank_transfer_bs.minor(),
        other_bs_minor: electronic.other_bs.minor(),
        zelle_usd_minor: electronic.zelle_usd.minor(),
        international_transfer_usd_minor: electronic.international_transfer_usd.minor(),
        other_usd_minor: electronic.other_usd.minor(),
    }
}

fn totals_view(totals: &ClosingTotals) -> ClosingTotalsView {
    ClosingTotalsView {
        total_cash_bs_minor: totals.total_cash_bs.minor(),
        total_cash_usd_minor: totals.total_cash_usd.minor(),
        total_electronic_bs_minor: totals.total_electronic_bs.minor(),
        total_electronic_usd_minor: totals.total_electronic_usd.minor(),
        total_usd_gross_minor: totals.total_usd_gross.minor(),
        usd_gross_in_bs_minor: totals.usd_gross_in_bs.minor(),
        total_collected_bs_minor: totals.total_collected_bs.minor(),
        credit_collections_usd_minor: totals.credit_collections_usd.minor(),
        advance_payments_usd_minor: totals.advance_payments_usd.minor(),
        net_adjustments_usd_minor: totals.net_adjustments_usd.minor(),
        discrepancy_bs_minor: totals.discrepancy_bs.minor(),
    }
}

pub(crate) fn preview_view(preview: &ClosingPreview) -> ClosingPreviewView {
    ClosingPreviewView {
        business_date: preview.business_date,
        rate: preview.exchange_rate.rate.to_string(),
        court_summary: court_summary_view(&preview.court_summary),
        totals: totals_view(&preview.totals),
    }
}

pub(crate) fn closing_view(closing: CashClosing) -> ClosingView {
    ClosingView {
        id: closing.id,
        cash_box: cash_box_to_api(closing.cash_box),
        business_date: closing.business_date,
        closed_at: closing.closed_at,
        rate: closing.rate.to_string(),
        opening_bs_minor: closing.opening_bs.minor(),
        opening_usd_minor: closing.opening_usd.minor(),
        cash_bs: closing.cash_bs.counts().clone(),
        cash_usd: closing.cash_usd.counts().clone(),
        electronic: electronic_to_api(&closing.electronic),
        totals: totals_view(&closing.totals),
        recorded_by: closing.recorded_by,
        cashier_name: closing.cashier_name,
        note: closing.note,
    }
}

pub(crate) fn kpi_view(kpi: CashierKpi) -> CashierKpiView {
    CashierKpiView {
        cashier_name: kpi.cashier_name,
        closings: u64::try_from(kpi.closings).unwrap_or(u64::MAX),
        total_collected_bs_minor: kpi.total_collected_bs.minor(),
        mean_abs_discrepancy_bs_minor: kpi.mean_abs_discrepancy_bs.minor(),
        mean_discrepancy_bs_minor: kpi.mean_discrepancy_bs.minor(),
        min_discrepancy_bs_minor: kpi.min_discrepancy_bs.minor(),
        max_discrepancy_bs_minor: kpi.max_discrepancy_bs.minor(),
        error_percentage: kpi.error_percentage,
    }
}
