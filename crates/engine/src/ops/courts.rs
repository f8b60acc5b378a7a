use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CourtSummary, CourtTransaction, CourtTransactionCmd, DateRange, ResultEngine, Session,
    court_transactions, util::ensure_positive,
};

use super::{
    Engine, is_unique_violation, normalize_optional_text, normalize_required_text, with_tx,
};

impl Engine {
    /// Log a court payment, credit or advance at `at`.
    ///
    /// A repeated idempotency key from the same user returns the transaction
    /// stored the first time.
    pub async fn record_court_transaction(
        &self,
        session: &Session,
        cmd: CourtTransactionCmd,
        at: DateTime<Utc>,
    ) -> ResultEngine<CourtTransaction> {
        ensure_positive(cmd.amount_usd, "amount")?;
        let client_name = normalize_required_text(&cmd.client_name, "client name")?;
        let idempotency_key = normalize_optional_text(cmd.idempotency_key.as_deref());

        let transaction = CourtTransaction {
            id: Uuid::new_v4(),
            kind: cmd.kind,
            court: cmd.court,
            client_name,
            amount_usd: cmd.amount_usd,
            payment_method: cmd.payment_method,
            note: normalize_optional_text(cmd.note.as_deref()),
            occurred_at: at,
            recorded_by: session.username.clone(),
        };

        if let Some(key) = idempotency_key.as_deref() {
            if let Some(existing) =
                court_transaction_by_key(&self.database, &session.username, key).await?
            {
                return Ok(existing);
            }
        }
        self.store_court_transaction(transaction, idempotency_key)
            .await
    }

    /// Insert a new transaction. When a concurrent request stored the same
    /// idempotency key first, the unique index rejects this insert and the
    /// stored transaction is returned instead.
    async fn store_court_transaction(
        &self,
        transaction: CourtTransaction,
        idempotency_key: Option<String>,
    ) -> ResultEngine<CourtTransaction> {
        let inserted = self
            .insert_court_transaction(transaction.clone(), idempotency_key.clone())
            .await;
        match (inserted, idempotency_key.as_deref()) {
            (Err(err), Some(key)) if is_unique_violation(&err) => {
                tracing::info!(
                    "idempotency key {key} of {} already stored, returning it",
                    transaction.recorded_by
                );
                court_transaction_by_key(&self.database, &transaction.recorded_by, key)
                    .await?
                    .ok_or(err)
            }
            (inserted, _) => inserted,
        }
    }

    async fn insert_court_transaction(
        &self,
        transaction: CourtTransaction,
        idempotency_key: Option<String>,
    ) -> ResultEngine<CourtTransaction> {
        with_tx!(self, |db_tx| {
            transaction
                .clone()
                .into_active_model(idempotency_key)
                .insert(&db_tx)
                .await?;
            tracing::info!(
                "court transaction {} ({}) recorded by {}",
                transaction.id,
                transaction.kind.as_str(),
                transaction.recorded_by
            );
            Ok(transaction)
        })
    }

    /// Court transactions of the given business days, oldest first.
    pub async fn court_transactions(
        &self,
        _session: &Session,
        range: DateRange,
    ) -> ResultEngine<Vec<CourtTransaction>> {
        transactions_in(&self.database, self.timezone, range).await
    }

    /// Adjustment buckets of the given business days.
    pub async fn court_summary(
        &self,
        session: &Session,
        range: DateRange,
    ) -> ResultEngine<CourtSummary> {
        let transactions = self.court_transactions(session, range).await?;
        Ok(CourtSummary::from_transactions(&transactions))
    }
}

async fn court_transaction_by_key<C: ConnectionTrait>(
    db: &C,
    recorded_by: &str,
    key: &str,
) -> ResultEngine<Option<CourtTransaction>> {
    court_transactions::Entity::find()
        .filter(court_transactions::Column::RecordedBy.eq(recorded_by))
        .filter(court_transactions::Column::IdempotencyKey.eq(key))
        .one(db)
        .await?
        .map(CourtTransaction::try_from)
        .transpose()
}

pub(super) async fn transactions_in<C: ConnectionTrait>(
    db: &C,
    timezone: chrono_tz::Tz,
    range: DateRange,
) -> ResultEngine<Vec<CourtTransaction>> {
    let (start, end) = range.utc_bounds(timezone)?;
    court_transactions::Entity::find()
        .filter(court_transactions::Column::OccurredAt.gte(start))
        .filter(court_transactions::Column::OccurredAt.lt(end))
        .order_by_asc(court_transactions::Column::OccurredAt)
        .all(db)
        .await?
        .into_iter()
        .map(CourtTransaction::try_from)
        .collect()
}
