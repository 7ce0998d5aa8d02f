//! Store adapter for weekly usage.
//!
//! Fetches the records a week's evaluation needs and hands them to
//! [`WeeklyUsageAccountant`]. Every function is generic over
//! [`ConnectionTrait`] so it runs equally on a plain connection or inside a
//! transaction. Date filters are derived from [`WeekKey::monday`] and
//! [`WeekKey::sunday`]; the accountant re-checks each entry with `week_key`.

use super::{
    accountant::{Verdict, WeeklyUsageAccountant},
    entry::NewMealEntry,
    option::list_options_with_tags,
    week::{WeekKey, week_key},
};
use crate::{
    entities::{MealEntry, MealOption, MealTemplate, Tag, meal_entry, meal_option, meal_template, tag},
    errors::{EntityKind, Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, prelude::*};
use std::collections::HashSet;
use tracing::debug;

/// Completed entries dated inside `week`, oldest first.
pub async fn list_completed_entries_for_week<C: ConnectionTrait>(
    db: &C,
    week: WeekKey,
) -> Result<Vec<meal_entry::Model>> {
    let entries = MealEntry::find()
        .filter(meal_entry::Column::Completed.eq(true))
        .filter(meal_entry::Column::Date.between(week.monday(), week.sunday()))
        .order_by_asc(meal_entry::Column::Date)
        .order_by_asc(meal_entry::Column::Id)
        .all(db)
        .await?;
    debug!(%week, count = entries.len(), "Loaded completed entries");
    Ok(entries)
}

/// Completed entries of one option inside `week`.
pub async fn list_completed_entries_for_option<C: ConnectionTrait>(
    db: &C,
    option_id: i64,
    week: WeekKey,
) -> Result<Vec<meal_entry::Model>> {
    MealEntry::find()
        .filter(meal_entry::Column::MealOptionId.eq(option_id))
        .filter(meal_entry::Column::Completed.eq(true))
        .filter(meal_entry::Column::Date.between(week.monday(), week.sunday()))
        .order_by_asc(meal_entry::Column::Date)
        .order_by_asc(meal_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Completed entries of any option of one template inside `week`.
///
/// An unknown template simply has no entries.
pub async fn list_completed_entries_for_template<C: ConnectionTrait>(
    db: &C,
    template_id: i64,
    week: WeekKey,
) -> Result<Vec<meal_entry::Model>> {
    let option_ids: Vec<i64> = MealOption::find()
        .filter(meal_option::Column::TemplateId.eq(template_id))
        .all(db)
        .await?
        .into_iter()
        .map(|option| option.id)
        .collect();
    if option_ids.is_empty() {
        return Ok(Vec::new());
    }

    MealEntry::find()
        .filter(meal_entry::Column::MealOptionId.is_in(option_ids))
        .filter(meal_entry::Column::Completed.eq(true))
        .filter(meal_entry::Column::Date.between(week.monday(), week.sunday()))
        .order_by_asc(meal_entry::Column::Date)
        .order_by_asc(meal_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fetches an option, failing with [`Error::NotFound`] if it does not exist.
pub async fn get_option<C: ConnectionTrait>(db: &C, id: i64) -> Result<meal_option::Model> {
    MealOption::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Option, id))
}

/// Fetches a template, failing with [`Error::NotFound`] if it does not exist.
pub async fn get_template<C: ConnectionTrait>(db: &C, id: i64) -> Result<meal_template::Model> {
    MealTemplate::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Template, id))
}

/// Fetches a tag, failing with [`Error::NotFound`] if it does not exist.
pub async fn get_tag<C: ConnectionTrait>(db: &C, id: i64) -> Result<tag::Model> {
    Tag::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Tag, id))
}

/// Walks the parent chain of `tag_id`, nearest parent first.
///
/// # Errors
/// * [`Error::NotFound`] if `tag_id` or any parent is missing
/// * [`Error::DataIntegrity`] if the chain loops
pub async fn list_ancestor_tags<C: ConnectionTrait>(db: &C, tag_id: i64) -> Result<Vec<tag::Model>> {
    let mut visited = HashSet::from([tag_id]);
    let mut chain = Vec::new();
    let mut next = get_tag(db, tag_id).await?.parent_tag_id;
    while let Some(parent_id) = next {
        if !visited.insert(parent_id) {
            return Err(Error::DataIntegrity {
                detail: format!("tag hierarchy above tag {tag_id} loops back to tag {parent_id}"),
            });
        }
        let parent = get_tag(db, parent_id).await?;
        next = parent.parent_tag_id;
        chain.push(parent);
    }
    Ok(chain)
}

/// Loads the full catalog plus the completed entries of `week`.
pub async fn load_accountant<C: ConnectionTrait>(
    db: &C,
    week: WeekKey,
) -> Result<WeeklyUsageAccountant> {
    let templates = MealTemplate::find().all(db).await?;
    let options = list_options_with_tags(db).await?;
    let tags = Tag::find().all(db).await?;
    let entries = list_completed_entries_for_week(db, week).await?;
    Ok(WeeklyUsageAccountant::new(templates, options, tags, entries))
}

/// Evaluates a prospective entry against the current contents of the store.
///
/// Nothing is written. See [`WeeklyUsageAccountant::evaluate`].
pub async fn evaluate_entry<C: ConnectionTrait>(db: &C, candidate: &NewMealEntry) -> Result<Verdict> {
    load_accountant(db, week_key(candidate.date))
        .await?
        .evaluate(candidate)
}

/// Completed uses of an option in `week`.
pub async fn count_for_option<C: ConnectionTrait>(
    db: &C,
    option_id: i64,
    week: WeekKey,
) -> Result<usize> {
    Ok(list_completed_entries_for_option(db, option_id, week)
        .await?
        .into_iter()
        .filter(|entry| week.contains(entry.date))
        .count())
}

/// Completed uses of all options of a template in `week`.
pub async fn count_for_template<C: ConnectionTrait>(
    db: &C,
    template_id: i64,
    week: WeekKey,
) -> Result<usize> {
    Ok(list_completed_entries_for_template(db, template_id, week)
        .await?
        .into_iter()
        .filter(|entry| week.contains(entry.date))
        .count())
}

/// Completed uses of a tag (including its descendants) in `week`.
pub async fn count_for_tag<C: ConnectionTrait>(db: &C, tag_id: i64, week: WeekKey) -> Result<usize> {
    load_accountant(db, week).await?.count_for_tag(tag_id, week)
}
