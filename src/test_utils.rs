//! Shared test utilities for meal-buddy.
//!
//! Helpers for setting up an in-memory database and creating catalog records
//! and entries with sensible defaults.

use crate::{
    core::{
        entry::{self, NewMealEntry},
        option::{self, NewMealOption},
        tag::{self, NewTag},
        template::{self, NewMealTemplate},
    },
    entities::{self, SlotType, meal_entry, meal_option, meal_template},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a template usable in every slot.
///
/// # Defaults
/// * `location_type`: any
/// * `description`: None
pub async fn create_test_template(
    db: &DatabaseConnection,
    name: &str,
    weekly_limit: Option<i32>,
) -> Result<meal_template::Model> {
    template::create_template(
        db,
        NewMealTemplate {
            weekly_limit,
            ..NewMealTemplate::new(name)
        },
    )
    .await
}

/// Creates an option under `template_id` with the given tags.
pub async fn create_test_option(
    db: &DatabaseConnection,
    template_id: i64,
    name: &str,
    tag_ids: &[i64],
) -> Result<meal_option::Model> {
    option::create_option(
        db,
        NewMealOption {
            template_id,
            name: name.to_string(),
            tag_ids: tag_ids.to_vec(),
            ..Default::default()
        },
    )
    .await
}

/// Creates an ingredient tag.
pub async fn create_test_tag(
    db: &DatabaseConnection,
    name: &str,
    weekly_suggestion: Option<i32>,
    parent_tag_id: Option<i64>,
) -> Result<entities::tag::Model> {
    tag::create_tag(
        db,
        NewTag {
            weekly_suggestion,
            parent_tag_id,
            ..NewTag::new(name)
        },
    )
    .await
}

/// Stores a completed lunch entry without evaluating limits.
pub async fn log_completed(
    db: &DatabaseConnection,
    option_id: i64,
    date: NaiveDate,
) -> Result<meal_entry::Model> {
    entry::create_entry(
        db,
        NewMealEntry {
            completed: Some(true),
            ..NewMealEntry::new(option_id, date, SlotType::Lunch)
        },
    )
    .await
}

/// Stores a planned (not completed) lunch entry.
pub async fn plan_entry(
    db: &DatabaseConnection,
    option_id: i64,
    date: NaiveDate,
) -> Result<meal_entry::Model> {
    entry::create_entry(
        db,
        NewMealEntry {
            completed: Some(false),
            ..NewMealEntry::new(option_id, date, SlotType::Lunch)
        },
    )
    .await
}
