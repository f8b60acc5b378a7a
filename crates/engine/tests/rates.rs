mod common;

use chrono::NaiveDate;

use common::{engine_with_db, rate, staff, utc};
use engine::{DateRange, EngineError, Role};

#[tokio::test]
async fn latest_rate_is_newest_by_timestamp() {
    let engine = engine_with_db().await;
    let cashier = staff(&engine, "ana", Role::Cashier).await;

    assert!(engine.latest_exchange_rate().await.unwrap().is_none());

    engine
        .record_exchange_rate(&cashier, rate("40"), utc(2026, 10, 14, 12, 0))
        .await
        .unwrap();
    // Back-dated entry recorded later must not win.
    engine
        .record_exchange_rate(&cashier, rate("36.5"), utc(2026, 10, 13, 12, 0))
        .await
        .unwrap();

    let latest = engine.latest_exchange_rate().await.unwrap().unwrap();
    assert_eq!(latest.rate, rate("40"));
    assert_eq!(latest.recorded_by, "ana");
}

#[tokio::test]
async fn rate_history_needs_supervisor() {
    let engine = engine_with_db().await;
    let cashier = staff(&engine, "ana", Role::Cashier).await;
    let supervisor = staff(&engine, "sofia", Role::Supervisor).await;

    for (day, value) in [(12, "35"), (13, "36"), (14, "37")] {
        engine
            .record_exchange_rate(&cashier, rate(value), utc(2026, 10, day, 15, 0))
            .await
            .unwrap();
    }

    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2026, 10, 13).unwrap(),
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(),
    )
    .unwrap();

    assert!(matches!(
        engine.exchange_rates(&cashier, range).await,
        Err(EngineError::Forbidden(_))
    ));

    let history = engine.exchange_rates(&supervisor, range).await.unwrap();
    let values: Vec<_> = history.iter().map(|r| r.rate.to_string()).collect();
    assert_eq!(values, ["36.0000", "37.0000"]);
}
