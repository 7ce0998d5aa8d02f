//! Tag entity - ingredient, dietary and prep-time labels with soft weekly suggestions.
//!
//! Tags form a forest through `parent_tag_id` (e.g. `pasta_integrale` -> `pasta`).
//! Usage of a child tag also counts toward every ancestor.

use super::TagCategory;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tag database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    /// Unique identifier for the tag
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Internal key, lowercase with underscores (e.g., `"pasta_integrale"`)
    #[sea_orm(unique)]
    pub name: String,
    /// User-facing label (e.g., "Pasta integrale")
    pub display_name: String,
    /// Category used for grouping
    pub category: TagCategory,
    /// Soft cap on weekly uses; `Some(0)` means "avoid entirely"
    pub weekly_suggestion: Option<i32>,
    /// Parent tag in the hierarchy, `None` for roots
    pub parent_tag_id: Option<i64>,
    /// When the tag was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Tag and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each tag may point at a parent tag
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentTagId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Parent,
    /// One tag is linked to many options
    #[sea_orm(has_many = "super::meal_option_tag::Entity")]
    OptionTags,
}

impl Related<super::meal_option_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OptionTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
