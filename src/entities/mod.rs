//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

mod enums;
pub mod meal_entry;
pub mod meal_option;
pub mod meal_option_tag;
pub mod meal_template;
pub mod tag;

pub use enums::{LocationType, SlotType, TagCategory};

// Re-export specific types to avoid conflicts
pub use meal_entry::{Column as MealEntryColumn, Entity as MealEntry, Model as MealEntryModel};
pub use meal_option::{
    Column as MealOptionColumn, Entity as MealOption, Model as MealOptionModel,
};
pub use meal_option_tag::{
    Column as MealOptionTagColumn, Entity as MealOptionTag, Model as MealOptionTagModel,
};
pub use meal_template::{
    Column as MealTemplateColumn, Entity as MealTemplate, Model as MealTemplateModel,
};
pub use tag::{Column as TagColumn, Entity as Tag, Model as TagModel};
