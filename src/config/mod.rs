/// Database configuration and connection management
pub mod database;

/// Catalog loading and seeding from catalog.toml
pub mod catalog;
