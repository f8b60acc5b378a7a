//! Court transaction endpoints

use api_types::{
    RangeQuery,
    court::{CourtSummaryView, CourtTransactionNew, CourtTransactionView},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use chrono::Utc;
use engine::{Court, CourtTransactionCmd, Money, Session};

use crate::{
    ServerError, export,
    server::ServerState,
    views::{court_summary_view, court_transaction_view, kind_from_api, method_from_api},
};

/// Log a court transaction at the current time
pub async fn record(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<CourtTransactionNew>,
) -> Result<(StatusCode, Json<CourtTransactionView>), ServerError> {
    let mut cmd = CourtTransactionCmd::new(
        kind_from_api(payload.kind),
        Court::new(payload.court)?,
        payload.client_name,
        Money::new(payload.amount_usd_minor),
        method_from_api(payload.payment_method),
    );
    cmd.note = payload.note;
    cmd.idempotency_key = payload.idempotency_key;

    let tx = state
        .engine
        .record_court_transaction(&session, cmd, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(court_transaction_view(tx))))
}

pub async fn list(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<CourtTransactionView>>, ServerError> {
    let range = state.range(query.from, query.to)?;
    let transactions = state.engine.court_transactions(&session, range).await?;
    Ok(Json(
        transactions
            .into_iter()
            .map(court_transaction_view)
            .collect(),
    ))
}

pub async fn summary(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<CourtSummaryView>, ServerError> {
    let range = state.range(query.from, query.to)?;
    let summary = state.engine.court_summary(&session, range).await?;
    Ok(Json(court_summary_view(&summary)))
}

/// Download the transactions of a range as CSV
pub async fn export(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, ServerError> {
    let range = state.range(query.from, query.to)?;
    let transactions = state.engine.court_transactions(&session, range).await?;
    let data = export::court_transactions_csv(&transactions)?;
    Ok(export::csv_response(
        &format!("transacciones_canchas_{}_{}.csv", range.from, range.to),
        data,
    ))
}
