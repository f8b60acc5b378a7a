use crate::{CashierKpi, ClosingFilter, ResultEngine, Session, cashier_kpis};

use super::Engine;

impl Engine {
    /// Per-cashier figures over the closings matching the filter.
    pub async fn cashier_kpis(
        &self,
        session: &Session,
        filter: &ClosingFilter,
    ) -> ResultEngine<Vec<CashierKpi>> {
        let closings = self.closings(session, filter).await?;
        Ok(cashier_kpis(&closings))
    }
}
