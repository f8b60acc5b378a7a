//! Cash-closing reconciliation engine.
//!
//! The pure calculators ([`calculate_closing_totals`], [`CourtSummary`],
//! [`cashier_kpis`]) live next to the storage entities; [`Engine`] ties them
//! to the database and enforces role checks for every operation.

pub use closings::{CashBox, CashClosing};
pub use commands::{ClosingFilter, ClosingInput, CourtTransactionCmd, NewUser, UserUpdate};
pub use court_summary::{CourtBucket, CourtSummary};
pub use court_transactions::{COURT_COUNT, Court, CourtTransaction, CourtTransactionKind, PaymentMethod};
pub use currency::{Currency, DENOMINATIONS_BS, DENOMINATIONS_USD};
pub use error::EngineError;
pub use exchange_rates::{ExchangeRate, Rate};
pub use kpis::{CashierKpi, cashier_kpis};
pub use money::Money;
pub use ops::{ClosingPreview, DEFAULT_TIMEZONE, Engine, EngineBuilder};
pub use period::{DateRange, business_date};
pub use reconciliation::{
    Adjustments, CashCount, ClosingTotals, ElectronicPayments, MAX_NOTE_COUNT,
    calculate_closing_totals,
};
pub use users::{Role, Session, User};

mod closings;
mod commands;
mod court_summary;
mod court_transactions;
mod currency;
mod error;
mod exchange_rates;
mod kpis;
mod money;
mod ops;
mod period;
mod reconciliation;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
