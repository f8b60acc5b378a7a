use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "caja={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let timezone = settings.app.timezone()?;
    let server = settings.server;
    tracing::info!("Found server settings...");

    let db = match parse_database(&server.database).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err);
        }
    };

    let engine = engine::Engine::builder()
        .database(db)
        .timezone(timezone)
        .build()
        .await?;
    tracing::info!("business timezone: {}", timezone.name());

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    if let Err(err) = server::run(engine, &bind, server.port).await {
        tracing::error!("server failed: {err}");
        return Err(err.into());
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
