mod common;

use chrono::{DateTime, NaiveDate, Utc};

use common::{engine_with_db, new_user, rate, staff, utc};
use engine::{
    Adjustments, CashBox, ClosingFilter, ClosingInput, Court, CourtTransactionCmd,
    CourtTransactionKind, DateRange, ElectronicPayments, Engine, EngineError, Money,
    PaymentMethod, Role, Session, calculate_closing_totals,
};

fn october(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn worked_example() -> ClosingInput {
    ClosingInput::new(CashBox::PadelCourts)
        .cash_bs(10, 3)
        .cash_bs(20, 1)
        .cash_usd(1, 5)
}

async fn court(
    engine: &Engine,
    session: &Session,
    kind: CourtTransactionKind,
    usd: i64,
    at: DateTime<Utc>,
) {
    let cmd = CourtTransactionCmd::new(
        kind,
        Court::new(1).unwrap(),
        "Cliente",
        Money::from_major(usd),
        PaymentMethod::ZelleUsd,
    );
    engine.record_court_transaction(session, cmd, at).await.unwrap();
}

#[tokio::test]
async fn closing_requires_an_exchange_rate() {
    let engine = engine_with_db().await;
    let cashier = staff(&engine, "ana", Role::Cashier).await;
    let at = utc(2026, 10, 14, 23, 0);

    assert_eq!(
        engine
            .preview_closing(&cashier, &worked_example(), at)
            .await
            .unwrap_err(),
        EngineError::MissingExchangeRate
    );
    assert_eq!(
        engine
            .submit_closing(&cashier, worked_example(), at)
            .await
            .unwrap_err(),
        EngineError::MissingExchangeRate
    );
}

#[tokio::test]
async fn submitted_closing_matches_worked_example() {
    let engine = engine_with_db().await;
    let cashier = staff(&engine, "ana", Role::Cashier).await;
    let supervisor = staff(&engine, "sofia", Role::Supervisor).await;
    engine
        .record_exchange_rate(&supervisor, rate("36"), utc(2026, 10, 14, 11, 0))
        .await
        .unwrap();
    engine
        .record_exchange_rate(&supervisor, rate("40"), utc(2026, 10, 14, 12, 0))
        .await
        .unwrap();
    let at = utc(2026, 10, 14, 23, 0);

    let preview = engine
        .preview_closing(&cashier, &worked_example(), at)
        .await
        .unwrap();
    assert_eq!(preview.business_date, october(14));
    assert_eq!(preview.exchange_rate.rate, rate("40"));
    assert_eq!(preview.totals.total_collected_bs, Money::from_major(250));
    assert!(
        engine
            .closings(&supervisor, &ClosingFilter::new(DateRange::day(october(14))))
            .await
            .unwrap()
            .is_empty()
    );

    let closing = engine
        .submit_closing(&cashier, worked_example().note("sin novedad"), at)
        .await
        .unwrap();
    assert_eq!(closing.totals, preview.totals);
    assert_eq!(closing.totals.total_cash_bs, Money::from_major(50));
    assert_eq!(closing.totals.total_usd_gross, Money::from_major(5));
    assert_eq!(closing.totals.discrepancy_bs, Money::ZERO);
    assert_eq!(closing.cashier_name, "ana Test");
    assert_eq!(closing.recorded_by, "ana");

    let stored = engine.closing(&cashier, closing.id).await.unwrap();
    assert_eq!(stored, closing);

    let recomputed = calculate_closing_totals(
        stored.rate,
        &stored.cash_bs,
        &stored.cash_usd,
        &stored.electronic,
        Adjustments {
            credit_collections_usd: stored.totals.credit_collections_usd,
            advance_payments_usd: stored.totals.advance_payments_usd,
        },
    );
    assert_eq!(recomputed, stored.totals);
}

#[tokio::test]
async fn court_adjustments_come_from_the_business_day() {
    let engine = engine_with_db().await;
    let cashier = staff(&engine, "ana", Role::Cashier).await;
    engine
        .record_exchange_rate(&cashier, rate("40"), utc(2026, 10, 14, 12, 0))
        .await
        .unwrap();

    court(&engine, &cashier, CourtTransactionKind::CreditCollection, 10, utc(2026, 10, 14, 15, 0)).await;
    court(&engine, &cashier, CourtTransactionKind::AdvancePayment, 5, utc(2026, 10, 14, 16, 0)).await;
    court(&engine, &cashier, CourtTransactionKind::NormalRental, 20, utc(2026, 10, 14, 17, 0)).await;
    // Previous and next local day.
    court(&engine, &cashier, CourtTransactionKind::CreditCollection, 50, utc(2026, 10, 14, 3, 0)).await;
    court(&engine, &cashier, CourtTransactionKind::AdvancePayment, 50, utc(2026, 10, 15, 4, 0)).await;

    let input = ClosingInput::new(CashBox::CafeBar).electronic(ElectronicPayments {
        mobile_payment_bs: Money::from_major(100),
        zelle_usd: Money::from_major(2),
        ..ElectronicPayments::default()
    });
    let closing = engine
        .submit_closing(&cashier, input, utc(2026, 10, 14, 23, 0))
        .await
        .unwrap();

    assert_eq!(closing.totals.credit_collections_usd, Money::from_major(10));
    assert_eq!(closing.totals.advance_payments_usd, Money::from_major(5));
    assert_eq!(closing.totals.net_adjustments_usd, Money::from_major(15));
    // 100 Bs + 2 USD × 40
    assert_eq!(closing.totals.total_collected_bs, Money::from_major(180));
}

#[tokio::test]
async fn invalid_input_writes_nothing() {
    let engine = engine_with_db().await;
    let cashier = staff(&engine, "ana", Role::Cashier).await;
    let supervisor = staff(&engine, "sofia", Role::Supervisor).await;
    engine
        .record_exchange_rate(&cashier, rate("40"), utc(2026, 10, 14, 12, 0))
        .await
        .unwrap();
    let at = utc(2026, 10, 14, 23, 0);

    let negative = ClosingInput::new(CashBox::CafeBar).electronic(ElectronicPayments {
        other_bs: Money::new(-1),
        ..ElectronicPayments::default()
    });
    assert!(matches!(
        engine.submit_closing(&cashier, negative, at).await,
        Err(EngineError::InvalidAmount(_))
    ));

    let foreign = ClosingInput::new(CashBox::CafeBar).cash_bs(5, 1);
    assert!(matches!(
        engine.submit_closing(&cashier, foreign, at).await,
        Err(EngineError::InvalidInput(_))
    ));

    let all = engine
        .closings(&supervisor, &ClosingFilter::new(DateRange::day(october(14))))
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn idempotency_key_returns_first_closing() {
    let engine = engine_with_db().await;
    let cashier = staff(&engine, "ana", Role::Cashier).await;
    let supervisor = staff(&engine, "sofia", Role::Supervisor).await;
    engine
        .record_exchange_rate(&cashier, rate("40"), utc(2026, 10, 14, 12, 0))
        .await
        .unwrap();
    let at = utc(2026, 10, 14, 23, 0);

    let first = engine
        .submit_closing(&cashier, worked_example().idempotency_key("k-1"), at)
        .await
        .unwrap();
    let again = engine
        .submit_closing(
            &cashier,
            worked_example().cash_usd(100, 1).idempotency_key("k-1"),
            at,
        )
        .await
        .unwrap();
    assert_eq!(again, first);

    let all = engine
        .closings(&supervisor, &ClosingFilter::new(DateRange::day(october(14))))
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn access_rules_for_reading_closings() {
    let engine = engine_with_db().await;
    let ana = staff(&engine, "ana", Role::Cashier).await;
    let luis = staff(&engine, "luis", Role::Cashier).await;
    let supervisor = staff(&engine, "sofia", Role::Supervisor).await;
    engine
        .record_exchange_rate(&ana, rate("40"), utc(2026, 10, 14, 12, 0))
        .await
        .unwrap();

    let closing = engine
        .submit_closing(&ana, worked_example(), utc(2026, 10, 14, 23, 0))
        .await
        .unwrap();

    assert!(engine.closing(&ana, closing.id).await.is_ok());
    assert!(engine.closing(&supervisor, closing.id).await.is_ok());
    assert!(matches!(
        engine.closing(&luis, closing.id).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.closing(&supervisor, uuid::Uuid::new_v4()).await,
        Err(EngineError::KeyNotFound(_))
    ));

    let filter = ClosingFilter::new(DateRange::day(october(14)));
    assert!(matches!(
        engine.closings(&ana, &filter).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.cashier_kpis(&ana, &filter).await,
        Err(EngineError::Forbidden(_))
    ));
}

#[tokio::test]
async fn filters_and_cashier_reports() {
    let engine = engine_with_db().await;
    let admin = staff(&engine, "root", Role::Admin).await;
    engine
        .create_user(&admin, new_user("maria", Role::Cashier, "María", "Pérez"))
        .await
        .unwrap();
    engine
        .create_user(&admin, new_user("luis", Role::Cashier, "Luis", "Gómez"))
        .await
        .unwrap();
    let maria = engine.session_for_user("maria").await.unwrap();
    let luis = engine.session_for_user("luis").await.unwrap();
    engine
        .record_exchange_rate(&admin, rate("40"), utc(2026, 10, 13, 12, 0))
        .await
        .unwrap();

    engine
        .submit_closing(&maria, worked_example(), utc(2026, 10, 13, 23, 0))
        .await
        .unwrap();
    engine
        .submit_closing(
            &maria,
            ClosingInput::new(CashBox::CafeBar).cash_bs(100, 1),
            utc(2026, 10, 14, 23, 0),
        )
        .await
        .unwrap();
    engine
        .submit_closing(&luis, worked_example(), utc(2026, 10, 14, 22, 0))
        .await
        .unwrap();
    // Belongs to the 15th in Caracas.
    engine
        .submit_closing(&luis, worked_example(), utc(2026, 10, 15, 5, 0))
        .await
        .unwrap();

    let range = DateRange::new(october(13), october(14)).unwrap();
    let all = engine
        .closings(&admin, &ClosingFilter::new(range))
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].closed_at <= w[1].closed_at));

    let cafe = engine
        .closings(&admin, &ClosingFilter::new(range).cash_box(CashBox::CafeBar))
        .await
        .unwrap();
    assert_eq!(cafe.len(), 1);
    assert_eq!(cafe[0].totals.total_collected_bs, Money::from_major(100));

    let by_name = engine
        .closings(&admin, &ClosingFilter::new(range).cashier("MARIA perez"))
        .await
        .unwrap();
    assert_eq!(by_name.len(), 2);

    let kpis = engine
        .cashier_kpis(&admin, &ClosingFilter::new(range))
        .await
        .unwrap();
    assert_eq!(kpis.len(), 2);
    assert_eq!(kpis[0].cashier_name, "Luis Gómez");
    assert_eq!(kpis[0].closings, 1);
    assert_eq!(kpis[1].cashier_name, "María Pérez");
    assert_eq!(kpis[1].closings, 2);
    assert_eq!(kpis[1].total_collected_bs, Money::from_major(350));
    assert_eq!(kpis[1].error_percentage, 0.0);
}
