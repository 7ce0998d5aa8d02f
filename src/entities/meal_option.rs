//! Meal option entity - a concrete variation inside a template.
//!
//! Example: the "ricotta" option of the "Pane con formaggio spalmabile" template.
//! Options are tagged through the `meal_option_tags` junction table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal option database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_options")]
pub struct Model {
    /// Unique identifier for the option
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the template this option belongs to
    pub template_id: i64,
    /// Name of the variation (e.g., "philadelphia", "ricotta")
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional nutrition remarks
    pub nutritional_notes: Option<String>,
    /// When the option was created
    pub created_at: DateTimeUtc,
    /// When the option was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `MealOption` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each option belongs to one template
    #[sea_orm(
        belongs_to = "super::meal_template::Entity",
        from = "Column::TemplateId",
        to = "super::meal_template::Column::Id",
        on_delete = "Cascade"
    )]
    Template,
    /// One option has many tag links
    #[sea_orm(has_many = "super::meal_option_tag::Entity")]
    OptionTags,
    /// One option has many entries
    #[sea_orm(has_many = "super::meal_entry::Entity")]
    Entries,
}

impl Related<super::meal_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl Related<super::meal_option_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OptionTags.def()
    }
}

impl Related<super::meal_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
