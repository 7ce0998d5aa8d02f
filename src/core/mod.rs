//! Framework-agnostic meal planning logic.
//!
//! `week` and `accountant` are pure; the remaining modules are async
//! operations over a `SeaORM` connection.

/// Pure weekly usage counting and limit evaluation
pub mod accountant;
/// Planning, logging and editing meal entries
pub mod entry;
/// Meal options and their tags
pub mod option;
/// Weekly usage reports and badges
pub mod report;
/// Tags and the tag hierarchy
pub mod tag;
/// Meal templates
pub mod template;
/// Store adapter feeding the accountant
pub mod usage;
/// Monday-anchored week keys
pub mod week;

pub use accountant::{TaggedOption, Verdict, WeeklyUsageAccountant};
pub use entry::{EntryOutcome, NewMealEntry};
pub use usage::{count_for_option, count_for_tag, count_for_template, evaluate_entry};
pub use week::{WeekKey, week_key};
