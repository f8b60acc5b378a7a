//! Cash closing endpoints

use api_types::closing::{ClosingNew, ClosingPreviewView, ClosingQuery, ClosingView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use chrono::Utc;
use engine::{ClosingFilter, ClosingInput, Money, Session};
use uuid::Uuid;

use crate::{
    ServerError, export,
    server::ServerState,
    views::{cash_box_from_api, closing_view, electronic_from_api, preview_view},
};

fn closing_input(payload: ClosingNew) -> ClosingInput {
    let mut input = ClosingInput::new(cash_box_from_api(payload.cash_box))
        .opening(
            Money::new(payload.opening_bs_minor),
            Money::new(payload.opening_usd_minor),
        )
        .electronic(electronic_from_api(&payload.electronic));
    input.cash_bs = payload.cash_bs;
    input.cash_usd = payload.cash_usd;
    input.note = payload.note;
    input.idempotency_key = payload.idempotency_key;
    input
}

pub(crate) fn closing_filter(
    state: &ServerState,
    query: ClosingQuery,
) -> Result<ClosingFilter, ServerError> {
    let mut filter = ClosingFilter::new(state.range(query.from, query.to)?);
    filter.cash_box = query.cash_box.map(cash_box_from_api);
    filter.cashier = query.cashier.filter(|name| !name.trim().is_empty());
    Ok(filter)
}

/// Compute the totals of a closing form without saving it
pub async fn preview(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<ClosingNew>,
) -> Result<Json<ClosingPreviewView>, ServerError> {
    let input = closing_input(payload);
    let preview = state
        .engine
        .preview_closing(&session, &input, Utc::now())
        .await?;
    Ok(Json(preview_view(&preview)))
}

/// Submit a closing for the current business day
pub async fn submit(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<ClosingNew>,
) -> Result<(StatusCode, Json<ClosingView>), ServerError> {
    let closing = state
        .engine
        .submit_closing(&session, closing_input(payload), Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(closing_view(closing))))
}

pub async fn get(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ClosingView>, ServerError> {
    let id = Uuid::parse_str(&id).map_err(|_| ServerError::Generic("invalid closing id".to_string()))?;
    let closing = state.engine.closing(&session, id).await?;
    Ok(Json(closing_view(closing)))
}

pub async fn list(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<ClosingQuery>,
) -> Result<Json<Vec<ClosingView>>, ServerError> {
    let filter = closing_filter(&state, query)?;
    let closings = state.engine.closings(&session, &filter).await?;
    Ok(Json(closings.into_iter().map(closing_view).collect()))
}

/// Download the filtered closings as CSV
pub async fn export(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<ClosingQuery>,
) -> Result<Response, ServerError> {
    let filter = closing_filter(&state, query)?;
    let closings = state.engine.closings(&session, &filter).await?;
    let data = export::closings_csv(&closings)?;
    Ok(export::csv_response(
        &format!("cierres_{}_{}.csv", filter.range.from, filter.range.to),
        data,
    ))
}
