//! CSV downloads of court transactions and closings.
//!
//! Amounts are written as formatted currency strings for people opening the
//! file in a spreadsheet.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use csv::{Writer, WriterBuilder};
use engine::{CashClosing, CourtTransaction, Currency};
use serde::Serialize;

use crate::ServerError;

#[derive(Serialize)]
struct CourtTransactionRow<'a> {
    occurred_at: String,
    kind: &'a str,
    court: String,
    client_name: &'a str,
    amount: String,
    payment_method: &'a str,
    note: &'a str,
    recorded_by: &'a str,
    id: String,
}

#[derive(Serialize)]
struct ClosingRow<'a> {
    business_date: String,
    closed_at: String,
    cash_box: &'a str,
    cashier_name: &'a str,
    rate: String,
    total_cash_bs: String,
    total_cash_usd: String,
    total_electronic_bs: String,
    total_electronic_usd: String,
    total_usd_gross: String,
    total_collected_bs: String,
    credit_collections_usd: String,
    advance_payments_usd: String,
    discrepancy_bs: String,
    note: &'a str,
    id: String,
}

const COURT_TRANSACTION_HEADER: [&str; 9] = [
    "occurred_at",
    "kind",
    "court",
    "client_name",
    "amount",
    "payment_method",
    "note",
    "recorded_by",
    "id",
];

const CLOSING_HEADER: [&str; 16] = [
    "business_date",
    "closed_at",
    "cash_box",
    "cashier_name",
    "rate",
    "total_cash_bs",
    "total_cash_usd",
    "total_electronic_bs",
    "total_electronic_usd",
    "total_usd_gross",
    "total_collected_bs",
    "credit_collections_usd",
    "advance_payments_usd",
    "discrepancy_bs",
    "note",
    "id",
];

/// Writer whose header row is present even when no row follows.
fn writer_with_header(header: &[&str]) -> Result<Writer<Vec<u8>>, ServerError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(vec![]);
    writer.write_record(header).map_err(serialize_error)?;
    Ok(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>, ServerError> {
    writer.into_inner().map_err(|err| {
        tracing::error!("failed to finalize export: {err}");
        ServerError::Generic("export failed".to_string())
    })
}

fn serialize_error(err: csv::Error) -> ServerError {
    tracing::error!("failed to serialize export row: {err}");
    ServerError::Generic("export failed".to_string())
}

pub(crate) fn court_transactions_csv(
    transactions: &[CourtTransaction],
) -> Result<Vec<u8>, ServerError> {
    let mut writer = writer_with_header(&COURT_TRANSACTION_HEADER)?;
    for tx in transactions {
        writer
            .serialize(CourtTransactionRow {
                occurred_at: tx.occurred_at.to_rfc3339(),
                kind: tx.kind.label(),
                court: tx.court.label(),
                client_name: &tx.client_name,
                amount: Currency::Usd.format(tx.amount_usd),
                payment_method: tx.payment_method.label(),
                note: tx.note.as_deref().unwrap_or_default(),
                recorded_by: &tx.recorded_by,
                id: tx.id.to_string(),
            })
            .map_err(serialize_error)?;
    }
    finish(writer)
}

pub(crate) fn closings_csv(closings: &[CashClosing]) -> Result<Vec<u8>, ServerError> {
    let bs = |amount| Currency::Ves.format(amount);
    let usd = |amount| Currency::Usd.format(amount);

    let mut writer = writer_with_header(&CLOSING_HEADER)?;
    for closing in closings {
        let t = &closing.totals;
        writer
            .serialize(ClosingRow {
                business_date: closing.business_date.to_string(),
                closed_at: closing.closed_at.to_rfc3339(),
                cash_box: closing.cash_box.label(),
                cashier_name: &closing.cashier_name,
                rate: closing.rate.to_string(),
                total_cash_bs: bs(t.total_cash_bs),
                total_cash_usd: usd(t.total_cash_usd),
                total_electronic_bs: bs(t.total_electronic_bs),
                total_electronic_usd: usd(t.total_electronic_usd),
                total_usd_gross: usd(t.total_usd_gross),
                total_collected_bs: bs(t.total_collected_bs),
                credit_collections_usd: usd(t.credit_collections_usd),
                advance_payments_usd: usd(t.advance_payments_usd),
                discrepancy_bs: bs(t.discrepancy_bs),
                note: closing.note.as_deref().unwrap_or_default(),
                id: closing.id.to_string(),
            })
            .map_err(serialize_error)?;
    }
    finish(writer)
}

/// Wrap CSV bytes in a download response.
pub(crate) fn csv_response(filename: &str, data: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        data,
    )
        .into_response()
}
