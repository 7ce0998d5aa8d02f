//! Fixed vocabularies shared by several tables.
//!
//! Stored as lowercase snake-case text so the database stays readable.

use crate::errors::Error;
use sea_orm::{ActiveEnum, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The five fixed meal slots of a day, in chronological order.
///
/// Ordering follows the day, so entries can be sorted by `(date, slot_type)`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    /// First meal of the day
    #[sea_orm(string_value = "breakfast")]
    Breakfast,
    /// Mid-morning snack
    #[sea_orm(string_value = "morning_snack")]
    MorningSnack,
    /// Lunch
    #[sea_orm(string_value = "lunch")]
    Lunch,
    /// Mid-afternoon snack
    #[sea_orm(string_value = "afternoon_snack")]
    AfternoonSnack,
    /// Dinner
    #[sea_orm(string_value = "dinner")]
    Dinner,
}

impl SlotType {
    /// All slots in the order they occur during the day.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Breakfast,
            Self::MorningSnack,
            Self::Lunch,
            Self::AfternoonSnack,
            Self::Dinner,
        ]
    }
}

/// Where a meal is prepared or eaten.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// At home
    #[sea_orm(string_value = "home")]
    Home,
    /// At the office
    #[sea_orm(string_value = "office")]
    Office,
    /// Eating out
    #[sea_orm(string_value = "restaurant")]
    Restaurant,
    /// Works anywhere
    #[sea_orm(string_value = "any")]
    Any,
}

impl LocationType {
    /// `Any` is compatible with everything, otherwise locations must match.
    #[must_use]
    pub fn is_compatible_with(self, other: Self) -> bool {
        self == Self::Any || other == Self::Any || self == other
    }
}

/// Grouping used to organise tags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    /// Ingredient tracking ("pasta", "ricotta")
    #[sea_orm(string_value = "ingredient")]
    Ingredient,
    /// Dietary restriction or property
    #[sea_orm(string_value = "dietary")]
    Dietary,
    /// Preparation time bucket
    #[sea_orm(string_value = "prep_time")]
    PrepTime,
    /// Anything else
    #[sea_orm(string_value = "other")]
    Other,
}

macro_rules! text_enum_conversions {
    ($($ty:ident => $label:literal),* $(,)?) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_value())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Self::try_from_value(&s.trim().to_string()).map_err(|_| {
                    Error::validation(format!(concat!("Invalid ", $label, ": '{}'"), s))
                })
            }
        }
    )*};
}

text_enum_conversions! {
    SlotType => "slot type",
    LocationType => "location type",
    TagCategory => "tag category",
}
