//! Tag business logic - labels with soft weekly suggestions arranged in a forest.
//!
//! Re-parenting is validated so the stored hierarchy stays acyclic. Deleting a
//! tag turns its children into roots.

use super::usage;
use crate::{
    entities::{MealOptionTag, Tag, TagCategory, meal_option_tag, tag},
    errors::{EntityKind, Error, Result},
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Input for [`create_tag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTag {
    /// Internal key: lowercase letters and underscores
    pub name: String,
    /// User-facing label; the name is used when empty
    pub display_name: String,
    /// Grouping
    pub category: TagCategory,
    /// Soft weekly cap, zero or more
    pub weekly_suggestion: Option<i32>,
    /// Parent in the hierarchy
    pub parent_tag_id: Option<i64>,
}

impl NewTag {
    /// A root ingredient tag without a suggestion.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: String::new(),
            category: TagCategory::Ingredient,
            weekly_suggestion: None,
            parent_tag_id: None,
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::validation("Tag name cannot be empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c == '_')
    {
        return Err(Error::validation(format!(
            "Tag name '{name}' may only contain lowercase letters and underscores"
        )));
    }
    Ok(())
}

/// Partial update of a tag. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUpdate {
    /// New internal key, unique
    pub name: Option<String>,
    /// New user-facing label, non-empty
    pub display_name: Option<String>,
    /// New grouping
    pub category: Option<TagCategory>,
    /// New soft weekly cap; `Some(None)` removes it
    pub weekly_suggestion: Option<Option<i32>>,
    /// New parent; `Some(None)` makes the tag a root
    pub parent_tag_id: Option<Option<i64>>,
}

fn validate_suggestion(suggestion: Option<i32>) -> Result<()> {
    match suggestion {
        Some(value) if value < 0 => Err(Error::validation(format!(
            "Weekly suggestion cannot be negative, got {value}"
        ))),
        _ => Ok(()),
    }
}

/// Fails unless `name` is free, ignoring the tag `except_id` itself.
async fn ensure_name_available<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except_id: Option<i64>,
) -> Result<()> {
    match get_tag_by_name(db, name).await? {
        Some(existing) if Some(existing.id) != except_id => Err(Error::validation(format!(
            "A tag named '{name}' already exists"
        ))),
        _ => Ok(()),
    }
}

/// Fails unless `tag` may be placed under `parent_id`.
async fn check_parent<C: ConnectionTrait>(db: &C, tag: &tag::Model, parent_id: i64) -> Result<()> {
    if parent_id == tag.id {
        return Err(Error::validation(format!(
            "Tag '{}' cannot be its own parent",
            tag.name
        )));
    }
    let parent = usage::get_tag(db, parent_id).await?;
    let above_parent = usage::list_ancestor_tags(db, parent_id).await?;
    if above_parent.iter().any(|ancestor| ancestor.id == tag.id) {
        return Err(Error::validation(format!(
            "Moving '{}' under '{}' would create a cycle",
            tag.name, parent.name
        )));
    }
    Ok(())
}

/// Creates a tag.
///
/// # Errors
/// Returns an error if:
/// - the name is empty, malformed or already taken
/// - the suggestion is negative
/// - the parent does not exist
/// - the database insert fails
pub async fn create_tag<C: ConnectionTrait>(db: &C, new_tag: NewTag) -> Result<tag::Model> {
    let name = new_tag.name.trim();
    validate_name(name)?;
    validate_suggestion(new_tag.weekly_suggestion)?;
    if let Some(parent_id) = new_tag.parent_tag_id {
        usage::get_tag(db, parent_id).await?;
    }
    ensure_name_available(db, name, None).await?;

    let display_name = match new_tag.display_name.trim() {
        "" => name.to_string(),
        label => label.to_string(),
    };
    let tag = tag::ActiveModel {
        name: Set(name.to_string()),
        display_name: Set(display_name),
        category: Set(new_tag.category),
        weekly_suggestion: Set(new_tag.weekly_suggestion),
        parent_tag_id: Set(new_tag.parent_tag_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let tag = tag.insert(db).await?;
    info!(tag_id = tag.id, name = %tag.name, parent = ?tag.parent_tag_id, "Created tag");
    Ok(tag)
}

/// Retrieves a tag by id.
pub async fn get_tag_by_id<C: ConnectionTrait>(db: &C, tag_id: i64) -> Result<Option<tag::Model>> {
    Tag::find_by_id(tag_id).one(db).await.map_err(Into::into)
}

/// Retrieves a tag by its internal name.
pub async fn get_tag_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<tag::Model>> {
    Tag::find()
        .filter(tag::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All tags ordered by name.
pub async fn list_tags<C: ConnectionTrait>(db: &C) -> Result<Vec<tag::Model>> {
    Tag::find()
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Tags of one category ordered by name.
pub async fn list_tags_by_category<C: ConnectionTrait>(
    db: &C,
    category: TagCategory,
) -> Result<Vec<tag::Model>> {
    Tag::find()
        .filter(tag::Column::Category.eq(category))
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Direct children of a tag ordered by name.
pub async fn list_children<C: ConnectionTrait>(db: &C, parent_id: i64) -> Result<Vec<tag::Model>> {
    Tag::find()
        .filter(tag::Column::ParentTagId.eq(parent_id))
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sets or clears the soft weekly suggestion.
pub async fn set_weekly_suggestion<C: ConnectionTrait>(
    db: &C,
    tag_id: i64,
    weekly_suggestion: Option<i32>,
) -> Result<tag::Model> {
    validate_suggestion(weekly_suggestion)?;
    let mut tag: tag::ActiveModel = usage::get_tag(db, tag_id).await?.into();
    tag.weekly_suggestion = Set(weekly_suggestion);
    tag.update(db).await.map_err(Into::into)
}

/// Moves a tag under `parent_id`, or makes it a root with `None`.
///
/// # Errors
/// * [`Error::Validation`] if the move would make the tag its own ancestor
/// * [`Error::NotFound`] if either tag does not exist
pub async fn set_parent<C: ConnectionTrait>(
    db: &C,
    tag_id: i64,
    parent_id: Option<i64>,
) -> Result<tag::Model> {
    let tag = usage::get_tag(db, tag_id).await?;
    if let Some(parent_id) = parent_id {
        check_parent(db, &tag, parent_id).await?;
    }

    let mut active: tag::ActiveModel = tag.into();
    active.parent_tag_id = Set(parent_id);
    active.update(db).await.map_err(Into::into)
}

/// Applies a partial update, validating every field that changes.
///
/// Nothing is written unless all changes are valid.
///
/// # Errors
/// Returns an error if:
/// - the tag or the new parent does not exist
/// - the new name is malformed or used by another tag
/// - the new display name is empty
/// - the new suggestion is negative
/// - the new parent would create a cycle
pub async fn update_tag<C: ConnectionTrait>(
    db: &C,
    tag_id: i64,
    changes: TagUpdate,
) -> Result<tag::Model> {
    let existing = usage::get_tag(db, tag_id).await?;
    let mut tag: tag::ActiveModel = existing.clone().into();

    if let Some(name) = &changes.name {
        let name = name.trim();
        validate_name(name)?;
        ensure_name_available(db, name, Some(tag_id)).await?;
        tag.name = Set(name.to_string());
    }
    if let Some(display_name) = &changes.display_name {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(Error::validation("Tag display name cannot be empty"));
        }
        tag.display_name = Set(display_name.to_string());
    }
    if let Some(category) = changes.category {
        tag.category = Set(category);
    }
    if let Some(weekly_suggestion) = changes.weekly_suggestion {
        validate_suggestion(weekly_suggestion)?;
        tag.weekly_suggestion = Set(weekly_suggestion);
    }
    if let Some(parent_id) = changes.parent_tag_id {
        if let Some(parent_id) = parent_id {
            check_parent(db, &existing, parent_id).await?;
        }
        tag.parent_tag_id = Set(parent_id);
    }

    let tag = tag.update(db).await?;
    info!(tag_id, name = %tag.name, "Updated tag");
    Ok(tag)
}

/// Deletes a tag and its option links; children become roots.
///
/// Returns `false` if the tag did not exist.
pub async fn delete_tag<C: ConnectionTrait>(db: &C, tag_id: i64) -> Result<bool> {
    Tag::update_many()
        .col_expr(tag::Column::ParentTagId, Expr::value(Option::<i64>::None))
        .filter(tag::Column::ParentTagId.eq(tag_id))
        .exec(db)
        .await?;
    MealOptionTag::delete_many()
        .filter(meal_option_tag::Column::TagId.eq(tag_id))
        .exec(db)
        .await?;
    let result = Tag::delete_by_id(tag_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
