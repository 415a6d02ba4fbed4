use crate::storage::entity::{field_boundary, form_response};
use log::info;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use std::time::Duration;

pub async fn establish_connection(
    db_url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());
    opt.max_connections(max_connections.max(1))
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    if db.get_database_backend() == sea_orm::DatabaseBackend::Sqlite {
        db.execute(sea_orm::Statement::from_string(
                sea_orm::DatabaseBackend::Sqlite,
                "PRAGMA journal_mode=WAL;".to_string(),
            ))
            .await?;
    }

    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Production questionnaires
    let stmt = builder.build(
        schema
            .create_table_from_entity(form_response::Entity)
            .if_not_exists(),
    );
    db.execute(stmt).await?;

    // Drawn field outlines; no foreign key to form_responses
    let stmt = builder.build(
        schema
            .create_table_from_entity(field_boundary::Entity)
            .if_not_exists(),
    );
    db.execute(stmt).await?;

    // Lookups by link key
    db.execute(sea_orm::Statement::from_string(
        builder,
        "CREATE INDEX IF NOT EXISTS idx_field_boundaries_key ON field_boundaries(farmer_id, crop_type);"
            .to_string(),
    ))
    .await?;
    db.execute(sea_orm::Statement::from_string(
        builder,
        "CREATE INDEX IF NOT EXISTS idx_form_responses_farmer ON form_responses(farmer_id);"
            .to_string(),
    ))
    .await?;

    info!("Database connection established and survey tables initialized.");

    Ok(db)
}
