//! Partial unique index allowing a single open trip per truck.
//!
//! `sea-query` cannot express the `WHERE` clause of a partial index, so the
//! statement is issued as raw SQL.

use sea_orm::{ConnectionTrait, Statement};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEX_NAME: &str = "idx-trips-truck_matricule-active-unique";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();
        db.execute(Statement::from_string(
            backend,
            format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{INDEX_NAME}\" \
                 ON trips (truck_matricule) WHERE is_active = 1;"
            ),
        ))
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();
        db.execute(Statement::from_string(
            backend,
            format!("DROP INDEX IF EXISTS \"{INDEX_NAME}\";"),
        ))
        .await?;
        Ok(())
    }
}
