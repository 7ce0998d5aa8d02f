//! Meal option business logic - variations inside a template and their tags.

use super::{accountant::TaggedOption, usage};
use crate::{
    entities::{MealEntry, MealOption, MealOptionTag, Tag, meal_entry, meal_option, meal_option_tag, tag},
    errors::{EntityKind, Error, Result},
};
use chrono::Utc;
use sea_orm::{Condition, ConnectionTrait, QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Input for [`create_option`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMealOption {
    /// Owning template
    pub template_id: i64,
    /// Variation name, non-empty
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional nutrition remarks
    pub nutritional_notes: Option<String>,
    /// Tags applied on creation
    pub tag_ids: Vec<i64>,
}

/// Partial update of an option. `None` fields are left unchanged.
///
/// The owning template is fixed once created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealOptionUpdate {
    /// New name, non-empty
    pub name: Option<String>,
    /// New description; `Some(None)` clears it
    pub description: Option<Option<String>>,
    /// New nutrition remarks; `Some(None)` clears them
    pub nutritional_notes: Option<Option<String>>,
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Option name cannot be empty"));
    }
    Ok(name)
}

async fn ensure_tags_exist<C: ConnectionTrait>(db: &C, tag_ids: &BTreeSet<i64>) -> Result<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let found: BTreeSet<i64> = Tag::find()
        .filter(tag::Column::Id.is_in(tag_ids.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    match tag_ids.difference(&found).next() {
        Some(&missing) => Err(Error::not_found(EntityKind::Tag, missing)),
        None => Ok(()),
    }
}

/// Creates an option under an existing template and applies its tags.
///
/// # Errors
/// Returns an error if:
/// - the name is empty
/// - the template or any tag does not exist
/// - a database operation fails
pub async fn create_option<C: ConnectionTrait>(
    db: &C,
    new_option: NewMealOption,
) -> Result<meal_option::Model> {
    let name = validate_name(&new_option.name)?;
    usage::get_template(db, new_option.template_id).await?;
    let tag_ids: BTreeSet<i64> = new_option.tag_ids.iter().copied().collect();
    ensure_tags_exist(db, &tag_ids).await?;

    let now = Utc::now();
    let option = meal_option::ActiveModel {
        template_id: Set(new_option.template_id),
        name: Set(name.to_string()),
        description: Set(new_option.description),
        nutritional_notes: Set(new_option.nutritional_notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let option = option.insert(db).await?;
    insert_links(db, option.id, &tag_ids).await?;
    info!(
        option_id = option.id,
        template_id = option.template_id,
        name = %option.name,
        tags = tag_ids.len(),
        "Created meal option"
    );
    Ok(option)
}

async fn insert_links<C: ConnectionTrait>(db: &C, option_id: i64, tag_ids: &BTreeSet<i64>) -> Result<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let links = tag_ids.iter().map(|&tag_id| meal_option_tag::ActiveModel {
        meal_option_id: Set(option_id),
        tag_id: Set(tag_id),
    });
    MealOptionTag::insert_many(links).exec_without_returning(db).await?;
    Ok(())
}

/// Retrieves an option by id.
pub async fn get_option_by_id<C: ConnectionTrait>(
    db: &C,
    option_id: i64,
) -> Result<Option<meal_option::Model>> {
    MealOption::find_by_id(option_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Options of one template ordered by name.
pub async fn list_options_for_template<C: ConnectionTrait>(
    db: &C,
    template_id: i64,
) -> Result<Vec<meal_option::Model>> {
    MealOption::find()
        .filter(meal_option::Column::TemplateId.eq(template_id))
        .order_by_asc(meal_option::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Options whose name or description contains `query`, ordered by name.
///
/// Matching uses SQL `LIKE`, so it ignores ASCII case.
pub async fn search_options<C: ConnectionTrait>(
    db: &C,
    query: &str,
) -> Result<Vec<meal_option::Model>> {
    MealOption::find()
        .filter(
            Condition::any()
                .add(meal_option::Column::Name.contains(query))
                .add(meal_option::Column::Description.contains(query)),
        )
        .order_by_asc(meal_option::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to an option.
///
/// # Errors
/// Fails with [`Error::NotFound`] if the option does not exist and with
/// [`Error::Validation`] if the new name is empty.
pub async fn update_option<C: ConnectionTrait>(
    db: &C,
    option_id: i64,
    changes: MealOptionUpdate,
) -> Result<meal_option::Model> {
    let mut option: meal_option::ActiveModel = usage::get_option(db, option_id).await?.into();
    if let Some(name) = &changes.name {
        option.name = Set(validate_name(name)?.to_string());
    }
    if let Some(description) = changes.description {
        option.description = Set(description);
    }
    if let Some(nutritional_notes) = changes.nutritional_notes {
        option.nutritional_notes = Set(nutritional_notes);
    }
    option.updated_at = Set(Utc::now());

    let option = option.update(db).await?;
    info!(option_id, name = %option.name, "Updated meal option");
    Ok(option)
}

/// Ids of the tags applied directly to an option, ascending.
pub async fn get_option_tag_ids<C: ConnectionTrait>(db: &C, option_id: i64) -> Result<Vec<i64>> {
    Ok(MealOptionTag::find()
        .filter(meal_option_tag::Column::MealOptionId.eq(option_id))
        .order_by_asc(meal_option_tag::Column::TagId)
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.tag_id)
        .collect())
}

/// Every option with its directly applied tag ids, ordered by option name.
pub async fn list_options_with_tags<C: ConnectionTrait>(db: &C) -> Result<Vec<TaggedOption>> {
    let options = MealOption::find()
        .order_by_asc(meal_option::Column::Name)
        .all(db)
        .await?;
    let mut tags_by_option: HashMap<i64, Vec<i64>> = HashMap::new();
    for link in MealOptionTag::find()
        .order_by_asc(meal_option_tag::Column::TagId)
        .all(db)
        .await?
    {
        tags_by_option
            .entry(link.meal_option_id)
            .or_default()
            .push(link.tag_id);
    }
    Ok(options
        .into_iter()
        .map(|option| TaggedOption {
            tag_ids: tags_by_option.remove(&option.id).unwrap_or_default(),
            option,
        })
        .collect())
}

/// Applies tags to an option, skipping those already present.
///
/// Returns the option's tag ids afterwards.
///
/// # Errors
/// Fails with [`Error::NotFound`] if the option or any tag does not exist.
pub async fn add_tags<C: ConnectionTrait>(db: &C, option_id: i64, tag_ids: &[i64]) -> Result<Vec<i64>> {
    usage::get_option(db, option_id).await?;
    let requested: BTreeSet<i64> = tag_ids.iter().copied().collect();
    ensure_tags_exist(db, &requested).await?;

    let existing: BTreeSet<i64> = get_option_tag_ids(db, option_id).await?.into_iter().collect();
    let missing: BTreeSet<i64> = requested.difference(&existing).copied().collect();
    insert_links(db, option_id, &missing).await?;
    debug!(option_id, added = missing.len(), "Added tags to option");
    get_option_tag_ids(db, option_id).await
}

/// Removes tags from an option. Returns how many links were deleted.
pub async fn remove_tags<C: ConnectionTrait>(db: &C, option_id: i64, tag_ids: &[i64]) -> Result<u64> {
    if tag_ids.is_empty() {
        return Ok(0);
    }
    let result = MealOptionTag::delete_many()
        .filter(meal_option_tag::Column::MealOptionId.eq(option_id))
        .filter(meal_option_tag::Column::TagId.is_in(tag_ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Replaces the option's tags with exactly `tag_ids`.
pub async fn set_tags<C: ConnectionTrait>(db: &C, option_id: i64, tag_ids: &[i64]) -> Result<Vec<i64>> {
    usage::get_option(db, option_id).await?;
    let requested: BTreeSet<i64> = tag_ids.iter().copied().collect();
    ensure_tags_exist(db, &requested).await?;

    MealOptionTag::delete_many()
        .filter(meal_option_tag::Column::MealOptionId.eq(option_id))
        .exec(db)
        .await?;
    insert_links(db, option_id, &requested).await?;
    Ok(requested.into_iter().collect())
}

/// Deletes an option with its tag links and entries.
///
/// Returns `false` if the option did not exist.
pub async fn delete_option<C: ConnectionTrait>(db: &C, option_id: i64) -> Result<bool> {
    MealOptionTag::delete_many()
        .filter(meal_option_tag::Column::MealOptionId.eq(option_id))
        .exec(db)
        .await?;
    let entries = MealEntry::delete_many()
        .filter(meal_entry::Column::MealOptionId.eq(option_id))
        .exec(db)
        .await?;
    let result = MealOption::delete_by_id(option_id).exec(db).await?;
    if result.rows_affected > 0 {
        info!(option_id, entries = entries.rows_affected, "Deleted meal option");
    }
    Ok(result.rows_affected > 0)
}
