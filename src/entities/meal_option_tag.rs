//! Junction table linking meal options to tags.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Option/tag link database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_option_tags")]
pub struct Model {
    /// Tagged option
    #[sea_orm(primary_key, auto_increment = false)]
    pub meal_option_id: i64,
    /// Tag applied to the option
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: i64,
}

/// Defines relationships between the junction and its two sides
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The option side
    #[sea_orm(
        belongs_to = "super::meal_option::Entity",
        from = "Column::MealOptionId",
        to = "super::meal_option::Column::Id",
        on_delete = "Cascade"
    )]
    MealOption,
    /// The tag side
    #[sea_orm(
        belongs_to = "super::tag::Entity",
        from = "Column::TagId",
        to = "super::tag::Column::Id",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<super::meal_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealOption.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
