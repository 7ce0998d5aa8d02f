//! Meal entry entity - a planned or logged assignment of an option to a date and slot.
//!
//! `completed = false` means planned, `completed = true` means eaten. Only
//! completed entries count toward weekly usage.
use super::{LocationType, SlotType};
use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the chosen option
    pub meal_option_id: i64,
    /// Calendar day of the meal
    pub date: NaiveDate,
    /// Daily slot of the meal
    pub slot_type: SlotType,
    /// Where the meal is eaten
    pub location: LocationType,
    /// Number of servings, positive
    pub servings: f64,
    /// Optional free-text notes
    pub notes: Option<String>,
    /// Planned (`false`) or consumed (`true`)
    pub completed: bool,
    /// When the entry was created
    pub created_at: DateTimeUtc,
    /// When the entry was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `MealEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry refers to one option
    #[sea_orm(
        belongs_to = "super::meal_option::Entity",
        from = "Column::MealOptionId",
        to = "super::meal_option::Column::Id",
        on_delete = "Cascade"
    )]
    MealOption,
}

impl Related<super::meal_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
