//! Exchange rate endpoints

use api_types::{
    RangeQuery,
    rate::{RateNew, RateView},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Rate, Session};

use crate::{ServerError, server::ServerState, views::rate_view};

/// Record a new Bs/USD rate effective now
pub async fn record(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<RateNew>,
) -> Result<(StatusCode, Json<RateView>), ServerError> {
    let rate: Rate = payload.rate.parse()?;
    let recorded = state
        .engine
        .record_exchange_rate(&session, rate, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(rate_view(recorded))))
}

/// Current rate, `null` before the first one is recorded
pub async fn latest(
    Extension(_session): Extension<Session>,
    State(state): State<ServerState>,
) -> Result<Json<Option<RateView>>, ServerError> {
    let latest = state.engine.latest_exchange_rate().await?;
    Ok(Json(latest.map(rate_view)))
}

pub async fn list(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<RateView>>, ServerError> {
    let range = state.range(query.from, query.to)?;
    let rates = state.engine.exchange_rates(&session, range).await?;
    Ok(Json(rates.into_iter().map(rate_view).collect()))
}
