mod common;

use chrono::NaiveDate;

use common::{engine_with_db, staff, utc};
use engine::{
    Court, CourtTransactionCmd, CourtTransactionKind, DateRange, EngineError, Money,
    PaymentMethod, Role,
};

fn cmd(kind: CourtTransactionKind, amount: i64) -> CourtTransactionCmd {
    CourtTransactionCmd::new(
        kind,
        Court::new(2).unwrap(),
        "Carlos Díaz",
        Money::from_major(amount),
        PaymentMethod::CashUsd,
    )
}

fn day(d: u32) -> DateRange {
    DateRange::day(NaiveDate::from_ymd_opt(2026, 10, d).unwrap())
}

#[tokio::test]
async fn records_and_lists_transactions() {
    let engine = engine_with_db().await;
    let cashier = staff(&engine, "ana", Role::Cashier).await;

    let recorded = engine
        .record_court_transaction(
            &cashier,
            cmd(CourtTransactionKind::NormalRental, 20).note("  turno 18h "),
            utc(2026, 10, 14, 22, 0),
        )
        .await
        .unwrap();
    assert_eq!(recorded.recorded_by, "ana");
    assert_eq!(recorded.note.as_deref(), Some("turno 18h"));

    engine
        .record_court_transaction(
            &cashier,
            cmd(CourtTransactionKind::AdvancePayment, 5),
            utc(2026, 10, 14, 13, 0),
        )
        .await
        .unwrap();

    let listed = engine.court_transactions(&cashier, day(14)).await.unwrap();
    let kinds: Vec<_> = listed.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [CourtTransactionKind::AdvancePayment, CourtTransactionKind::NormalRental]
    );
    assert_eq!(listed[1], recorded);
}

#[tokio::test]
async fn rejects_invalid_transactions() {
    let engine = engine_with_db().await;
    let cashier = staff(&engine, "ana", Role::Cashier).await;
    let at = utc(2026, 10, 14, 15, 0);

    assert!(matches!(
        engine
            .record_court_transaction(&cashier, cmd(CourtTransactionKind::NormalRental, 0), at)
            .await,
        Err(EngineError::InvalidAmount(_))
    ));

    let mut blank = cmd(CourtTransactionKind::NormalRental, 10);
    blank.client_name = "   ".to_string();
    assert_eq!(
        engine
            .record_court_transaction(&cashier, blank, at)
            .await
            .unwrap_err(),
        EngineError::InvalidInput("client name must not be empty".to_string())
    );

    assert!(engine.court_transactions(&cashier, day(14)).await.unwrap().is_empty());
}

#[tokio::test]
async fn idempotency_key_returns_first_transaction() {
    let engine = engine_with_db().await;
    let ana = staff(&engine, "ana", Role::Cashier).await;
    let luis = staff(&engine, "luis", Role::Cashier).await;
    let at = utc(2026, 10, 14, 15, 0);

    let first = engine
        .record_court_transaction(
            &ana,
            cmd(CourtTransactionKind::CreditCollection, 10).idempotency_key("form-1"),
            at,
        )
        .await
        .unwrap();
    let again = engine
        .record_court_transaction(
            &ana,
            cmd(CourtTransactionKind::CreditCollection, 99).idempotency_key("form-1"),
            at,
        )
        .await
        .unwrap();
    assert_eq!(again.id, first.id);
    assert_eq!(again.amount_usd, Money::from_major(10));

    // Keys are scoped per user.
    let other = engine
        .record_court_transaction(
            &luis,
            cmd(CourtTransactionKind::CreditCollection, 10).idempotency_key("form-1"),
            at,
        )
        .await
        .unwrap();
    assert_ne!(other.id, first.id);

    assert_eq!(engine.court_transactions(&ana, day(14)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn summary_follows_business_day() {
    let engine = engine_with_db().await;
    let cashier = staff(&engine, "ana", Role::Cashier).await;

    let entries = [
        (CourtTransactionKind::CreditCollection, 10, utc(2026, 10, 14, 15, 0)),
        (CourtTransactionKind::AdvancePayment, 5, utc(2026, 10, 14, 16, 0)),
        (CourtTransactionKind::NormalRental, 20, utc(2026, 10, 14, 17, 0)),
        // 23:30 in Caracas, still the 14th.
        (CourtTransactionKind::SuspensionCredit, 8, utc(2026, 10, 15, 3, 30)),
        // 00:30 on the 15th in Caracas.
        (CourtTransactionKind::CreditCollection, 7, utc(2026, 10, 15, 4, 30)),
        // 22:00 on the 13th in Caracas.
        (CourtTransactionKind::AdvancePayment, 3, utc(2026, 10, 14, 2, 0)),
    ];
    for (kind, amount, at) in entries {
        engine
            .record_court_transaction(&cashier, cmd(kind, amount), at)
            .await
            .unwrap();
    }

    let summary = engine.court_summary(&cashier, day(14)).await.unwrap();
    assert_eq!(summary.credit_collected_usd, Money::from_major(10));
    assert_eq!(summary.advance_suspended_usd, Money::from_major(13));
    assert_eq!(summary.excluded_usd, Money::from_major(20));
    assert_eq!(summary.transactions, 4);

    let next = engine.court_summary(&cashier, day(15)).await.unwrap();
    assert_eq!(next.credit_collected_usd, Money::from_major(7));
    assert_eq!(next.transactions, 1);
}
