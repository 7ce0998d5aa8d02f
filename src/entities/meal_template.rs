//! Meal template entity - the reusable "cards" that fill a daily slot.
//!
//! A template groups one or more options (ingredient variations) and may carry a
//! hard weekly limit that caps the combined completed uses of all its options.

use super::{LocationType, SlotType};
use crate::errors::{self, Error};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal template database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_templates")]
pub struct Model {
    /// Unique identifier for the template
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Pane con marmellata"), unique
    #[sea_orm(unique)]
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Comma-separated slot values this template can fill (e.g., `"breakfast,lunch"`)
    pub compatible_slots: String,
    /// Where this meal can be prepared
    pub location_type: LocationType,
    /// Hard cap on completed uses per week across all options, if any
    pub weekly_limit: Option<i32>,
    /// When the template was created
    pub created_at: DateTimeUtc,
    /// When the template was last modified
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Decodes the stored `compatible_slots` column.
    pub fn slots(&self) -> errors::Result<Vec<SlotType>> {
        decode_slots(&self.compatible_slots)
    }

    /// Whether the template may be logged into `slot`.
    ///
    /// Unreadable slot data is treated as incompatible.
    #[must_use]
    pub fn accepts_slot(&self, slot: SlotType) -> bool {
        self.slots().is_ok_and(|slots| slots.contains(&slot))
    }
}

/// Encodes slots for the `compatible_slots` column, keeping day order and dropping duplicates.
#[must_use]
pub fn encode_slots(slots: &[SlotType]) -> String {
    SlotType::all()
        .into_iter()
        .filter(|slot| slots.contains(slot))
        .map(|slot| slot.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses a `compatible_slots` column value.
pub fn decode_slots(raw: &str) -> errors::Result<Vec<SlotType>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse().map_err(|_| Error::DataIntegrity {
                detail: format!("unknown slot '{part}' in compatible_slots"),
            })
        })
        .collect()
}

/// Defines relationships between `MealTemplate` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One template has many options
    #[sea_orm(has_many = "super::meal_option::Entity")]
    Options,
}

impl Related<super::meal_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
