use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Adjustments, CashClosing, CashCount, ClosingFilter, ClosingInput, ClosingTotals,
    CourtSummary, DateRange, EngineError, ExchangeRate, ResultEngine, Role, Session,
    calculate_closing_totals, closings, util::normalize_name_key,
};

use super::{
    Engine, courts::transactions_in, is_unique_violation, normalize_optional_text,
    rates::latest_rate, with_tx,
};

/// Totals a closing would have if submitted now.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClosingPreview {
    pub business_date: NaiveDate,
    pub exchange_rate: ExchangeRate,
    pub court_summary: CourtSummary,
    pub totals: ClosingTotals,
}

struct Prepared {
    cash_bs: CashCount,
    cash_usd: CashCount,
    preview: ClosingPreview,
}

impl Engine {
    async fn prepare_closing<C: ConnectionTrait>(
        &self,
        db: &C,
        input: &ClosingInput,
        at: DateTime<Utc>,
    ) -> ResultEngine<Prepared> {
        let (cash_bs, cash_usd) = input.validate()?;
        let exchange_rate = latest_rate(db)
            .await?
            .ok_or(EngineError::MissingExchangeRate)?;

        let business_date = self.business_date(at);
        let transactions = transactions_in(db, self.timezone, DateRange::day(business_date)).await?;
        let court_summary = CourtSummary::from_transactions(&transactions);

        let totals = calculate_closing_totals(
            exchange_rate.rate,
            &cash_bs,
            &cash_usd,
            &input.electronic,
            Adjustments::from(&court_summary),
        );

        Ok(Prepared {
            cash_bs,
            cash_usd,
            preview: ClosingPreview {
                business_date,
                exchange_rate,
                court_summary,
                totals,
            },
        })
    }

    /// Validate a closing and compute its totals without storing anything.
    pub async fn preview_closing(
        &self,
        _session: &Session,
        input: &ClosingInput,
        at: DateTime<Utc>,
    ) -> ResultEngine<ClosingPreview> {
        self.prepare_closing(&self.database, input, at)
            .await
            .map(|prepared| prepared.preview)
    }

    /// Store a closing for the business day of `at`.
    ///
    /// Totals are computed here from the latest exchange rate and the court
    /// adjustments of the day; the stored row is never updated afterwards.
    pub async fn submit_closing(
        &self,
        session: &Session,
        input: ClosingInput,
        at: DateTime<Utc>,
    ) -> ResultEngine<CashClosing> {
        let idempotency_key = normalize_optional_text(input.idempotency_key.as_deref());

        if let Some(key) = idempotency_key.as_deref() {
            if let Some(existing) = closing_by_key(&self.database, &session.username, key).await? {
                return Ok(existing);
            }
        }

        self.store_closing(session, input, at, idempotency_key).await
    }

    /// Insert a new closing. When a concurrent submit stored the same
    /// idempotency key first, the unique index rejects this insert and the
    /// stored closing is returned instead.
    async fn store_closing(
        &self,
        session: &Session,
        input: ClosingInput,
        at: DateTime<Utc>,
        idempotency_key: Option<String>,
    ) -> ResultEngine<CashClosing> {
        let inserted = self
            .insert_closing(session, input, at, idempotency_key.clone())
            .await;
        match (inserted, idempotency_key.as_deref()) {
            (Err(err), Some(key)) if is_unique_violation(&err) => {
                tracing::info!(
                    "idempotency key {key} of {} already stored, returning it",
                    session.username
                );
                closing_by_key(&self.database, &session.username, key)
                    .await?
                    .ok_or(err)
            }
            (inserted, _) => inserted,
        }
    }

    async fn insert_closing(
        &self,
        session: &Session,
        input: ClosingInput,
        at: DateTime<Utc>,
        idempotency_key: Option<String>,
    ) -> ResultEngine<CashClosing> {
        with_tx!(self, |db_tx| {
            let prepared = self.prepare_closing(&db_tx, &input, at).await?;
            let cashier_name = session.display_name();
            let closing = CashClosing {
                id: Uuid::new_v4(),
                cash_box: input.cash_box,
                business_date: prepared.preview.business_date,
                closed_at: at,
                recorded_by: session.username.clone(),
                cashier_name,
                rate: prepared.preview.exchange_rate.rate,
                opening_bs: input.opening_bs,
                opening_usd: input.opening_usd,
                cash_bs: prepared.cash_bs,
                cash_usd: prepared.cash_usd,
                electronic: input.electronic,
                totals: prepared.preview.totals,
                note: normalize_optional_text(input.note.as_deref()),
            };

            closing
                .to_active_model(normalize_name_key(&closing.cashier_name), idempotency_key)?
                .insert(&db_tx)
                .await?;
            tracing::info!(
                "closing {} ({}, {}) submitted by {}: {} Bs collected",
                closing.id,
                closing.cash_box.as_str(),
                closing.business_date,
                session.username,
                closing.totals.total_collected_bs
            );
            Ok(closing)
        })
    }

    /// A single closing; supervisors see all of them, others only their own.
    pub async fn closing(&self, session: &Session, id: Uuid) -> ResultEngine<CashClosing> {
        let model = closings::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        if model.recorded_by != session.username {
            session.require(Role::Supervisor)?;
        }
        CashClosing::try_from(model)
    }

    /// Closings matching the filter, oldest first.
    pub async fn closings(
        &self,
        session: &Session,
        filter: &ClosingFilter,
    ) -> ResultEngine<Vec<CashClosing>> {
        session.require(Role::Supervisor)?;

        let mut query = closings::Entity::find()
            .filter(closings::Column::BusinessDate.gte(filter.range.from))
            .filter(closings::Column::BusinessDate.lte(filter.range.to));
        if let Some(cash_box) = filter.cash_box {
            query = query.filter(closings::Column::CashBox.eq(cash_box.as_str()));
        }
        if let Some(cashier) = filter.cashier.as_deref() {
            query = query.filter(closings::Column::CashierNameNorm.eq(normalize_name_key(cashier)));
        }

        query
            .order_by_asc(closings::Column::ClosedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(CashClosing::try_from)
            .collect()
    }
}

async fn closing_by_key<C: ConnectionTrait>(
    db: &C,
    recorded_by: &str,
    key: &str,
) -> ResultEngine<Option<CashClosing>> {
    closings::Entity::find()
        .filter(closings::Column::RecordedBy.eq(recorded_by))
        .filter(closings::Column::IdempotencyKey.eq(key))
        .one(db)
        .await?
        .map(CashClosing::try_from)
        .transpose()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use migration::MigratorTrait;
    use sea_orm::{Database, PaginatorTrait};

    use super::*;
    use crate::{CashBox, NewUser, Rate};

    #[tokio::test]
    async fn duplicate_key_insert_returns_the_stored_closing() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();
        let ana = engine
            .bootstrap_user(NewUser {
                username: "ana".to_string(),
                pin: "1111".to_string(),
                role: Role::Cashier,
                first_name: "Ana".to_string(),
                last_name: "Rojas".to_string(),
            })
            .await
            .unwrap();
        let session = engine.session_for_user(&ana.username).await.unwrap();
        let at = Utc.with_ymd_and_hms(2026, 10, 14, 22, 0, 0).unwrap();
        engine
            .record_exchange_rate(&session, "40".parse::<Rate>().unwrap(), at)
            .await
            .unwrap();

        let input = ClosingInput::new(CashBox::CafeBar).cash_bs(10, 3);
        let key = || Some("form-1".to_string());
        let first = engine
            .store_closing(&session, input.clone(), at, key())
            .await
            .unwrap();
        // skips the lookup, as a request racing the first one would
        let second = engine
            .store_closing(&session, input.clone().cash_bs(20, 1), at, key())
            .await
            .unwrap();
        assert_eq!(second, first);

        let err = engine
            .insert_closing(&session, input, at, key())
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
        assert_eq!(closings::Entity::find().count(&engine.database).await.unwrap(), 1);
    }
}
