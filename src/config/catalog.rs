//! Catalog seeding from `catalog.toml`.
//!
//! The catalog file declares tags and templates (with their options) that
//! should exist in the database. Seeding inserts only what is missing, matched
//! by name, so it is safe to run on every start.
//!
//! Tags may be listed in any order: parents are linked after every new tag of
//! the file has been created.
//!
//! ```toml
//! [[tags]]
//! name = "pasta"
//! display_name = "Pasta"
//! weekly_suggestion = 3
//!
//! [[tags]]
//! name = "pasta_integrale"
//! parent = "pasta"
//!
//! [[templates]]
//! name = "Pasta al pomodoro"
//! compatible_slots = ["lunch", "dinner"]
//! weekly_limit = 3
//!
//! [[templates.options]]
//! name = "integrale"
//! tags = ["pasta_integrale"]
//! ```

use crate::{
    core::{option, tag, template},
    entities::{LocationType, SlotType, TagCategory},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// The whole catalog file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Tags, parents before children
    pub tags: Vec<TagConfig>,
    /// Templates with their options
    pub templates: Vec<TemplateConfig>,
}

/// One `[[tags]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct TagConfig {
    /// Internal name
    pub name: String,
    /// Label; defaults to the name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Category; defaults to `ingredient`
    #[serde(default = "default_category")]
    pub category: TagCategory,
    /// Soft weekly suggestion
    #[serde(default)]
    pub weekly_suggestion: Option<i32>,
    /// Name of the parent tag
    #[serde(default)]
    pub parent: Option<String>,
}

/// One `[[templates]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    /// Unique template name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Slots the template may fill
    pub compatible_slots: Vec<SlotType>,
    /// Preparation location; defaults to `any`
    #[serde(default = "default_location")]
    pub location_type: LocationType,
    /// Hard weekly limit
    #[serde(default)]
    pub weekly_limit: Option<i32>,
    /// Options of this template
    #[serde(default)]
    pub options: Vec<OptionConfig>,
}

/// One `[[templates.options]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionConfig {
    /// Variation name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional nutrition remarks
    #[serde(default)]
    pub nutritional_notes: Option<String>,
    /// Tag names applied to the option
    #[serde(default)]
    pub tags: Vec<String>,
}

const fn default_category() -> TagCategory {
    TagCategory::Ingredient
}

const fn default_location() -> LocationType {
    LocationType::Any
}

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// New tags
    pub tags_created: usize,
    /// New templates
    pub templates_created: usize,
    /// New options, including those of pre-existing templates
    pub options_created: usize,
}

impl SeedSummary {
    /// `true` when nothing had to be inserted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tags_created == 0 && self.templates_created == 0 && self.options_created == 0
    }
}

/// Loads a catalog from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid catalog.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read {}: {e}", path.as_ref().display()),
    })?;
    parse_config(&contents)
}

/// Loads `./catalog.toml`.
pub fn load_default_config() -> Result<CatalogConfig> {
    load_config("catalog.toml")
}

fn parse_config(contents: &str) -> Result<CatalogConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog: {e}"),
    })
}

/// Inserts the tags, templates and options of `config` that are not stored yet.
///
/// Everything runs in one transaction: either the whole catalog is applied or
/// nothing is. Existing records are matched by name and left unchanged.
///
/// # Errors
/// * [`Error::Config`] if a parent or option tag names an unknown tag
/// * [`Error::Validation`] if a declared record is invalid or the declared
///   parents form a loop
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    let mut created_tags = Vec::new();
    for tag_config in &config.tags {
        if let Some(tag_id) = seed_tag(&txn, tag_config).await? {
            created_tags.push((tag_id, tag_config));
        }
    }
    summary.tags_created = created_tags.len();
    for (tag_id, tag_config) in created_tags {
        link_parent(&txn, tag_id, tag_config).await?;
    }

    for template_config in &config.templates {
        let (template_id, created) = seed_template(&txn, template_config).await?;
        if created {
            summary.templates_created += 1;
        }
        let existing: Vec<String> = option::list_options_for_template(&txn, template_id)
            .await?
            .into_iter()
            .map(|o| o.name)
            .collect();
        for option_config in &template_config.options {
            if existing.iter().any(|name| name == option_config.name.trim()) {
                continue;
            }
            seed_option(&txn, template_id, option_config).await?;
            summary.options_created += 1;
        }
    }

    txn.commit().await?;
    info!(
        tags = summary.tags_created,
        templates = summary.templates_created,
        options = summary.options_created,
        "Catalog seeded"
    );
    Ok(summary)
}

async fn resolve_tag<C: ConnectionTrait>(db: &C, name: &str, context: &str) -> Result<i64> {
    tag::get_tag_by_name(db, name.trim())
        .await?
        .map(|t| t.id)
        .ok_or_else(|| Error::Config {
            message: format!("{context} refers to unknown tag '{name}'"),
        })
}

/// Creates the tag as a root. Returns its id, or `None` if it already existed.
async fn seed_tag<C: ConnectionTrait>(db: &C, config: &TagConfig) -> Result<Option<i64>> {
    if tag::get_tag_by_name(db, config.name.trim()).await?.is_some() {
        debug!(name = %config.name, "Tag already present");
        return Ok(None);
    }
    let created = tag::create_tag(
        db,
        tag::NewTag {
            name: config.name.clone(),
            display_name: config.display_name.clone().unwrap_or_default(),
            category: config.category,
            weekly_suggestion: config.weekly_suggestion,
            parent_tag_id: None,
        },
    )
    .await?;
    Ok(Some(created.id))
}

async fn link_parent<C: ConnectionTrait>(db: &C, tag_id: i64, config: &TagConfig) -> Result<()> {
    let Some(parent) = &config.parent else {
        return Ok(());
    };
    let parent_id = resolve_tag(db, parent, &format!("Tag '{}'", config.name)).await?;
    tag::set_parent(db, tag_id, Some(parent_id)).await?;
    Ok(())
}

async fn seed_template<C: ConnectionTrait>(db: &C, config: &TemplateConfig) -> Result<(i64, bool)> {
    if let Some(existing) = template::get_template_by_name(db, config.name.trim()).await? {
        debug!(name = %config.name, "Template already present");
        return Ok((existing.id, false));
    }
    let created = template::create_template(
        db,
        template::NewMealTemplate {
            name: config.name.clone(),
            description: config.description.clone(),
            compatible_slots: config.compatible_slots.clone(),
            location_type: config.location_type,
            weekly_limit: config.weekly_limit,
        },
    )
    .await?;
    Ok((created.id, true))
}

async fn seed_option<C: ConnectionTrait>(db: &C, template_id: i64, config: &OptionConfig) -> Result<()> {
    let context = format!("Option '{}'", config.name);
    let mut tag_ids = Vec::with_capacity(config.tags.len());
    for name in &config.tags {
        tag_ids.push(resolve_tag(db, name, &context).await?);
    }
    option::create_option(
        db,
        option::NewMealOption {
            template_id,
            name: config.name.clone(),
            description: config.description.clone(),
            nutritional_notes: config.nutritional_notes.clone(),
            tag_ids,
        },
    )
    .await?;
    Ok(())
}
