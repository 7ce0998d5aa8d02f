//! Meal template business logic.
//!
//! Templates are the reusable cards of the planner. Each one lists the slots
//! it may fill and may carry a hard weekly limit shared by all of its options.

use super::option;
use crate::{
    entities::{
        LocationType, MealOption, MealTemplate, SlotType, meal_option,
        meal_template::{self, encode_slots},
    },
    errors::{EntityKind, Error, Result},
};
use chrono::Utc;
use sea_orm::{Condition, ConnectionTrait, QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Input for [`create_template`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMealTemplate {
    /// Unique display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Slots the template can fill, at least one
    pub compatible_slots: Vec<SlotType>,
    /// Where the meal is prepared
    pub location_type: LocationType,
    /// Hard weekly cap, positive when set
    pub weekly_limit: Option<i32>,
}

impl NewMealTemplate {
    /// A template usable in every slot and location, without a limit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            compatible_slots: SlotType::all().to_vec(),
            location_type: LocationType::Any,
            weekly_limit: None,
        }
    }
}

/// Partial update of a template. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealTemplateUpdate {
    /// New unique name
    pub name: Option<String>,
    /// New description; `Some(None)` clears it
    pub description: Option<Option<String>>,
    /// New slot list, at least one
    pub compatible_slots: Option<Vec<SlotType>>,
    /// New location
    pub location_type: Option<LocationType>,
    /// New hard weekly cap; `Some(None)` removes it
    pub weekly_limit: Option<Option<i32>>,
}

fn validate_weekly_limit(limit: Option<i32>) -> Result<()> {
    match limit {
        Some(value) if value <= 0 => Err(Error::validation(format!(
            "Weekly limit must be a positive integer, got {value}"
        ))),
        _ => Ok(()),
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Template name cannot be empty"));
    }
    Ok(name)
}

fn validate_slots(name: &str, slots: &[SlotType]) -> Result<()> {
    if slots.is_empty() {
        return Err(Error::validation(format!(
            "Template '{name}' needs at least one compatible slot"
        )));
    }
    Ok(())
}

/// Fails unless `name` is free, ignoring the template `except_id` itself.
async fn ensure_name_available<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except_id: Option<i64>,
) -> Result<()> {
    match get_template_by_name(db, name).await? {
        Some(existing) if Some(existing.id) != except_id => Err(Error::validation(format!(
            "A template named '{name}' already exists"
        ))),
        _ => Ok(()),
    }
}

/// Creates a template after validating its fields.
///
/// # Errors
/// Returns an error if:
/// - the name is empty or already taken
/// - no compatible slot is given
/// - the weekly limit is zero or negative
/// - the database insert fails
pub async fn create_template<C: ConnectionTrait>(
    db: &C,
    new_template: NewMealTemplate,
) -> Result<meal_template::Model> {
    let name = validate_name(&new_template.name)?;
    validate_slots(name, &new_template.compatible_slots)?;
    validate_weekly_limit(new_template.weekly_limit)?;
    ensure_name_available(db, name, None).await?;

    let now = Utc::now();
    let template = meal_template::ActiveModel {
        name: Set(name.to_string()),
        description: Set(new_template.description),
        compatible_slots: Set(encode_slots(&new_template.compatible_slots)),
        location_type: Set(new_template.location_type),
        weekly_limit: Set(new_template.weekly_limit),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let template = template.insert(db).await?;
    info!(template_id = template.id, name = %template.name, "Created meal template");
    Ok(template)
}

/// Retrieves a template by id.
pub async fn get_template_by_id<C: ConnectionTrait>(
    db: &C,
    template_id: i64,
) -> Result<Option<meal_template::Model>> {
    MealTemplate::find_by_id(template_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a template by its exact name.
pub async fn get_template_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<meal_template::Model>> {
    MealTemplate::find()
        .filter(meal_template::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All templates ordered by name.
pub async fn list_templates<C: ConnectionTrait>(db: &C) -> Result<Vec<meal_template::Model>> {
    MealTemplate::find()
        .order_by_asc(meal_template::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Templates usable in `slot`, ordered by name.
///
/// # Errors
/// Fails with [`Error::DataIntegrity`] if a stored slot list is unreadable.
pub async fn list_templates_for_slot<C: ConnectionTrait>(
    db: &C,
    slot: SlotType,
) -> Result<Vec<meal_template::Model>> {
    let mut matching = Vec::new();
    for template in list_templates(db).await? {
        if template.slots()?.contains(&slot) {
            matching.push(template);
        }
    }
    Ok(matching)
}

/// Templates for `location`, including those marked [`LocationType::Any`], ordered by name.
pub async fn list_templates_for_location<C: ConnectionTrait>(
    db: &C,
    location: LocationType,
) -> Result<Vec<meal_template::Model>> {
    MealTemplate::find()
        .filter(
            Condition::any()
                .add(meal_template::Column::LocationType.eq(location))
                .add(meal_template::Column::LocationType.eq(LocationType::Any)),
        )
        .order_by_asc(meal_template::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Templates whose name or description contains `query`, ordered by name.
///
/// Matching uses SQL `LIKE`, so it ignores ASCII case.
pub async fn search_templates<C: ConnectionTrait>(
    db: &C,
    query: &str,
) -> Result<Vec<meal_template::Model>> {
    MealTemplate::find()
        .filter(
            Condition::any()
                .add(meal_template::Column::Name.contains(query))
                .add(meal_template::Column::Description.contains(query)),
        )
        .order_by_asc(meal_template::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update, validating every field that changes.
///
/// # Errors
/// Returns an error if:
/// - the template does not exist
/// - the new name is empty or used by another template
/// - the new slot list is empty
/// - the new weekly limit is zero or negative
pub async fn update_template<C: ConnectionTrait>(
    db: &C,
    template_id: i64,
    changes: MealTemplateUpdate,
) -> Result<meal_template::Model> {
    let existing = get_template_by_id(db, template_id)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Template, template_id))?;
    let mut template: meal_template::ActiveModel = existing.clone().into();

    if let Some(name) = &changes.name {
        let name = validate_name(name)?;
        ensure_name_available(db, name, Some(template_id)).await?;
        template.name = Set(name.to_string());
    }
    if let Some(slots) = &changes.compatible_slots {
        validate_slots(&existing.name, slots)?;
        template.compatible_slots = Set(encode_slots(slots));
    }
    if let Some(weekly_limit) = changes.weekly_limit {
        validate_weekly_limit(weekly_limit)?;
        template.weekly_limit = Set(weekly_limit);
    }
    if let Some(description) = changes.description {
        template.description = Set(description);
    }
    if let Some(location_type) = changes.location_type {
        template.location_type = Set(location_type);
    }
    template.updated_at = Set(Utc::now());

    let template = template.update(db).await?;
    info!(template_id, name = %template.name, "Updated meal template");
    Ok(template)
}

/// Sets or clears the hard weekly limit.
///
/// Stored entries are untouched; only later evaluations see the new value.
pub async fn set_weekly_limit<C: ConnectionTrait>(
    db: &C,
    template_id: i64,
    weekly_limit: Option<i32>,
) -> Result<meal_template::Model> {
    validate_weekly_limit(weekly_limit)?;
    let mut template: meal_template::ActiveModel = get_template_by_id(db, template_id)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Template, template_id))?
        .into();
    template.weekly_limit = Set(weekly_limit);
    template.updated_at = Set(Utc::now());
    let template = template.update(db).await?;
    info!(template_id, ?weekly_limit, "Updated weekly limit");
    Ok(template)
}

/// Deletes a template together with its options and their entries.
///
/// Returns `false` if the template did not exist.
pub async fn delete_template<C: ConnectionTrait>(db: &C, template_id: i64) -> Result<bool> {
    let option_ids: Vec<i64> = MealOption::find()
        .filter(meal_option::Column::TemplateId.eq(template_id))
        .all(db)
        .await?
        .into_iter()
        .map(|o| o.id)
        .collect();
    for option_id in option_ids {
        option::delete_option(db, option_id).await?;
    }
    let result = MealTemplate::delete_by_id(template_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Fails with [`Error::IncompatibleSlot`] unless `template` accepts `slot`.
///
/// # Errors
/// Also fails with [`Error::DataIntegrity`] if the stored slot list is unreadable.
pub fn check_slot_compatibility(template: &meal_template::Model, slot: SlotType) -> Result<()> {
    if template.slots()?.contains(&slot) {
        Ok(())
    } else {
        Err(Error::IncompatibleSlot {
            template: template.name.clone(),
            slot,
        })
    }
}
