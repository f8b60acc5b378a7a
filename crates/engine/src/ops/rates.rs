use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{DateRange, ExchangeRate, Rate, ResultEngine, Role, Session, exchange_rates};

use super::{Engine, with_tx};

impl Engine {
    /// Record the Bs/USD rate in effect from `at`. Any role may do this.
    pub async fn record_exchange_rate(
        &self,
        session: &Session,
        rate: Rate,
        at: DateTime<Utc>,
    ) -> ResultEngine<ExchangeRate> {
        let exchange_rate = ExchangeRate::new(rate, at, session.username.clone());
        let model: exchange_rates::ActiveModel = (&exchange_rate).into();
        with_tx!(self, |db_tx| {
            model.insert(&db_tx).await?;
            tracing::info!("exchange rate {rate} recorded by {}", session.username);
            Ok(exchange_rate)
        })
    }

    /// Most recent rate by timestamp, `None` before the first one.
    pub async fn latest_exchange_rate(&self) -> ResultEngine<Option<ExchangeRate>> {
        latest_rate(&self.database).await
    }

    /// Rates recorded within the given business days, oldest first.
    pub async fn exchange_rates(
        &self,
        session: &Session,
        range: DateRange,
    ) -> ResultEngine<Vec<ExchangeRate>> {
        session.require(Role::Supervisor)?;
        let (start, end) = range.utc_bounds(self.timezone)?;
        exchange_rates::Entity::find()
            .filter(exchange_rates::Column::RecordedAt.gte(start))
            .filter(exchange_rates::Column::RecordedAt.lt(end))
            .order_by_asc(exchange_rates::Column::RecordedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(ExchangeRate::try_from)
            .collect()
    }
}

pub(super) async fn latest_rate<C: ConnectionTrait>(db: &C) -> ResultEngine<Option<ExchangeRate>> {
    exchange_rates::Entity::find()
        .order_by_desc(exchange_rates::Column::RecordedAt)
        .one(db)
        .await?
        .map(ExchangeRate::try_from)
        .transpose()
}
