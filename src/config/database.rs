//! Database configuration for meal-buddy.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust models without hand-written SQL.

use crate::entities::{MealEntry, MealOption, MealOptionTag, MealTemplate, Tag};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://meal_buddy.sqlite?mode=rwc";

/// Gets the database URL from `DATABASE_URL`, falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Connects to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    info!(url = %database_url, "Connecting to database");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates every table that does not exist yet.
///
/// Referenced tables are created before the tables pointing at them.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = [
        schema.create_table_from_entity(MealTemplate),
        schema.create_table_from_entity(Tag),
        schema.create_table_from_entity(MealOption),
        schema.create_table_from_entity(MealOptionTag),
        schema.create_table_from_entity(MealEntry),
    ];
    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    Ok(())
}
