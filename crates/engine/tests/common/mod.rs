#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::Database;

use engine::{Engine, NewUser, Rate, Role, Session};
use migration::MigratorTrait;

pub async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

pub fn new_user(username: &str, role: Role, first_name: &str, last_name: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        pin: "1234".to_string(),
        role,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

/// Create an account and return its session.
pub async fn staff(engine: &Engine, username: &str, role: Role) -> Session {
    engine
        .bootstrap_user(new_user(username, role, username, "Test"))
        .await
        .unwrap();
    engine.session_for_user(username).await.unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn rate(value: &str) -> Rate {
    value.parse().unwrap()
}
