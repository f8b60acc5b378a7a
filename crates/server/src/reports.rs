//! Report endpoints

use api_types::{closing::ClosingQuery, report::CashierKpiView};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::Session;

use crate::{ServerError, closings::closing_filter, server::ServerState, views::kpi_view};

/// Per-cashier figures over the filtered closings
pub async fn cashiers(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Query(query): Query<ClosingQuery>,
) -> Result<Json<Vec<CashierKpiView>>, ServerError> {
    let filter = closing_filter(&state, query)?;
    let kpis = state.engine.cashier_kpis(&session, &filter).await?;
    Ok(Json(kpis.into_iter().map(kpi_view).collect()))
}
