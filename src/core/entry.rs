//! Meal entry business logic - planning, logging and editing entries.
//!
//! [`create_entry`] stores an entry without looking at limits. [`log_entry`]
//! is the guarded path: it checks slot compatibility, evaluates weekly limits
//! and inserts, all inside a single database transaction, and refuses to save
//! when a hard limit is reached.
//!
//! Editing an entry never re-evaluates limits, and changes to templates or
//! tags never touch stored entries.

use super::{
    accountant::Verdict,
    template::check_slot_compatibility,
    usage,
    week::{WeekKey, week_key},
};
use crate::{
    entities::{LocationType, MealEntry, SlotType, meal_entry},
    errors::{EntityKind, Error, Result},
};
use chrono::{Local, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Servings used when none are given.
pub const DEFAULT_SERVINGS: f64 = 1.0;

/// A prospective entry, before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMealEntry {
    /// Chosen option
    pub meal_option_id: i64,
    /// Day of the meal
    pub date: NaiveDate,
    /// Daily slot
    pub slot_type: SlotType,
    /// Where the meal is eaten
    pub location: LocationType,
    /// Servings, [`DEFAULT_SERVINGS`] when `None`
    pub servings: Option<f64>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Explicit completion state; derived from the date when `None`
    pub completed: Option<bool>,
}

impl NewMealEntry {
    /// An entry at home with default servings and date-derived completion.
    #[must_use]
    pub const fn new(meal_option_id: i64, date: NaiveDate, slot_type: SlotType) -> Self {
        Self {
            meal_option_id,
            date,
            slot_type,
            location: LocationType::Home,
            servings: None,
            notes: None,
            completed: None,
        }
    }

    /// Rejects non-positive or non-finite servings.
    pub fn validate(&self) -> Result<()> {
        if let Some(servings) = self.servings {
            validate_servings(servings)?;
        }
        Ok(())
    }

    /// Servings to store.
    #[must_use]
    pub fn servings_or_default(&self) -> f64 {
        self.servings.unwrap_or(DEFAULT_SERVINGS)
    }

    /// Completion state to store: explicit value, else `true` only for days before `today`.
    #[must_use]
    pub fn completed_or_default(&self, today: NaiveDate) -> bool {
        self.completed.unwrap_or(self.date < today)
    }
}

/// Partial update of a stored entry. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealEntryUpdate {
    /// New option
    pub meal_option_id: Option<i64>,
    /// New day
    pub date: Option<NaiveDate>,
    /// New slot
    pub slot_type: Option<SlotType>,
    /// New location
    pub location: Option<LocationType>,
    /// New servings
    pub servings: Option<f64>,
    /// New notes; `Some(None)` clears them
    pub notes: Option<Option<String>>,
    /// New completion state
    pub completed: Option<bool>,
}

/// Result of [`log_entry`].
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// The entry was saved; `warnings` lists reached tag suggestions
    Created {
        /// The stored entry
        entry: meal_entry::Model,
        /// Soft warnings to show the user
        warnings: Vec<String>,
    },
    /// A hard limit was reached and nothing was saved
    Blocked(Verdict),
}

fn validate_servings(servings: f64) -> Result<()> {
    if !servings.is_finite() || servings <= 0.0 {
        return Err(Error::validation(format!(
            "Servings must be a positive number, got {servings}"
        )));
    }
    Ok(())
}

async fn insert_entry<C: ConnectionTrait>(
    db: &C,
    new_entry: &NewMealEntry,
    today: NaiveDate,
) -> Result<meal_entry::Model> {
    let now = Utc::now();
    let entry = meal_entry::ActiveModel {
        meal_option_id: Set(new_entry.meal_option_id),
        date: Set(new_entry.date),
        slot_type: Set(new_entry.slot_type),
        location: Set(new_entry.location),
        servings: Set(new_entry.servings_or_default()),
        notes: Set(new_entry.notes.clone()),
        completed: Set(new_entry.completed_or_default(today)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let entry = entry.insert(db).await?;
    debug!(
        entry_id = entry.id,
        option_id = entry.meal_option_id,
        date = %entry.date,
        completed = entry.completed,
        "Stored meal entry"
    );
    Ok(entry)
}

/// Stores an entry without evaluating weekly limits.
///
/// # Errors
/// Returns an error if:
/// - servings are not a positive number
/// - the option does not exist
/// - the database insert fails
pub async fn create_entry<C: ConnectionTrait>(
    db: &C,
    new_entry: NewMealEntry,
) -> Result<meal_entry::Model> {
    new_entry.validate()?;
    usage::get_option(db, new_entry.meal_option_id).await?;
    insert_entry(db, &new_entry, Local::now().date_naive()).await
}

/// Checks the slot, evaluates weekly limits and stores the entry if allowed.
///
/// Load, evaluation and insert share one transaction. A blocked verdict is
/// returned as [`EntryOutcome::Blocked`], not as an error.
///
/// # Errors
/// Returns an error if:
/// - servings are not a positive number
/// - the option or its template does not exist
/// - the template is not compatible with the requested slot
/// - any database operation fails
pub async fn log_entry(db: &DatabaseConnection, new_entry: NewMealEntry) -> Result<EntryOutcome> {
    new_entry.validate()?;
    let txn = db.begin().await?;

    let option = usage::get_option(&txn, new_entry.meal_option_id).await?;
    let template = usage::get_template(&txn, option.template_id).await?;
    check_slot_compatibility(&template, new_entry.slot_type)?;

    let accountant = usage::load_accountant(&txn, week_key(new_entry.date)).await?;
    let verdict = accountant.evaluate(&new_entry)?;
    if verdict.blocked {
        txn.rollback().await?;
        info!(
            template = %template.name,
            date = %new_entry.date,
            "Entry blocked by weekly limit"
        );
        return Ok(EntryOutcome::Blocked(verdict));
    }

    let entry = insert_entry(&txn, &new_entry, Local::now().date_naive()).await?;
    txn.commit().await?;
    Ok(EntryOutcome::Created {
        entry,
        warnings: verdict.warnings,
    })
}

/// Retrieves an entry by id.
pub async fn get_entry_by_id<C: ConnectionTrait>(
    db: &C,
    entry_id: i64,
) -> Result<Option<meal_entry::Model>> {
    MealEntry::find_by_id(entry_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All entries of one day, planned and completed, in slot order.
pub async fn list_entries_for_date<C: ConnectionTrait>(
    db: &C,
    date: NaiveDate,
) -> Result<Vec<meal_entry::Model>> {
    let mut entries = MealEntry::find()
        .filter(meal_entry::Column::Date.eq(date))
        .order_by_asc(meal_entry::Column::Id)
        .all(db)
        .await?;
    entries.sort_by_key(|entry| entry.slot_type);
    Ok(entries)
}

/// All entries of one week, planned and completed, by day then slot.
pub async fn list_entries_in_week<C: ConnectionTrait>(
    db: &C,
    week: WeekKey,
) -> Result<Vec<meal_entry::Model>> {
    list_entries_in_range(db, week.monday(), week.sunday()).await
}

/// All entries from `start` to `end` inclusive, by day then slot.
///
/// # Errors
/// Fails with [`Error::Validation`] if `start` is after `end`.
pub async fn list_entries_in_range<C: ConnectionTrait>(
    db: &C,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<meal_entry::Model>> {
    if start > end {
        return Err(Error::validation(format!(
            "Date range starts after it ends: {start} > {end}"
        )));
    }
    let mut entries = MealEntry::find()
        .filter(meal_entry::Column::Date.between(start, end))
        .order_by_asc(meal_entry::Column::Id)
        .all(db)
        .await?;
    entries.retain(|entry| (start..=end).contains(&entry.date));
    entries.sort_by_key(|entry| (entry.date, entry.slot_type));
    Ok(entries)
}

/// Entries filling one slot on one day, oldest first.
pub async fn list_entries_for_date_and_slot<C: ConnectionTrait>(
    db: &C,
    date: NaiveDate,
    slot_type: SlotType,
) -> Result<Vec<meal_entry::Model>> {
    MealEntry::find()
        .filter(meal_entry::Column::Date.eq(date))
        .filter(meal_entry::Column::SlotType.eq(slot_type))
        .order_by_asc(meal_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every entry of one option, planned and completed, by day then slot.
pub async fn list_entries_for_option<C: ConnectionTrait>(
    db: &C,
    option_id: i64,
) -> Result<Vec<meal_entry::Model>> {
    let mut entries = MealEntry::find()
        .filter(meal_entry::Column::MealOptionId.eq(option_id))
        .order_by_asc(meal_entry::Column::Id)
        .all(db)
        .await?;
    entries.sort_by_key(|entry| (entry.date, entry.slot_type));
    Ok(entries)
}

async fn find_entry<C: ConnectionTrait>(db: &C, entry_id: i64) -> Result<meal_entry::Model> {
    get_entry_by_id(db, entry_id)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Entry, entry_id))
}

/// Applies a partial update. Weekly limits are not re-evaluated.
///
/// # Errors
/// Returns an error if the entry or the new option does not exist, or if the
/// new servings are not a positive number.
pub async fn update_entry<C: ConnectionTrait>(
    db: &C,
    entry_id: i64,
    changes: MealEntryUpdate,
) -> Result<meal_entry::Model> {
    if let Some(servings) = changes.servings {
        validate_servings(servings)?;
    }
    let mut entry: meal_entry::ActiveModel = find_entry(db, entry_id).await?.into();

    if let Some(option_id) = changes.meal_option_id {
        usage::get_option(db, option_id).await?;
        entry.meal_option_id = Set(option_id);
    }
    if let Some(date) = changes.date {
        entry.date = Set(date);
    }
    if let Some(slot_type) = changes.slot_type {
        entry.slot_type = Set(slot_type);
    }
    if let Some(location) = changes.location {
        entry.location = Set(location);
    }
    if let Some(servings) = changes.servings {
        entry.servings = Set(servings);
    }
    if let Some(notes) = changes.notes {
        entry.notes = Set(notes);
    }
    if let Some(completed) = changes.completed {
        entry.completed = Set(completed);
    }
    entry.updated_at = Set(Utc::now());

    entry.update(db).await.map_err(Into::into)
}

/// Marks an entry as eaten (`true`) or planned (`false`).
pub async fn set_completed<C: ConnectionTrait>(
    db: &C,
    entry_id: i64,
    completed: bool,
) -> Result<meal_entry::Model> {
    update_entry(
        db,
        entry_id,
        MealEntryUpdate {
            completed: Some(completed),
            ..Default::default()
        },
    )
    .await
}

/// Deletes an entry. Returns `false` if it did not exist.
pub async fn delete_entry<C: ConnectionTrait>(db: &C, entry_id: i64) -> Result<bool> {
    let result = MealEntry::delete_by_id(entry_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
