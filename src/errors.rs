//! Unified error type for the meal planner.
//!
//! Reaching a weekly limit is not an error: it is reported through
//! [`crate::core::accountant::Verdict`]. The variants here cover dangling
//! references, corrupt stored data, rejected input and storage failures.

use crate::entities::SlotType;
use std::fmt;
use thiserror::Error;

/// The kind of record a [`Error::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A meal template
    Template,
    /// A meal option
    Option,
    /// A tag
    Tag,
    /// A meal entry
    Entry,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Template => "meal template",
            Self::Option => "meal option",
            Self::Tag => "tag",
            Self::Entry => "meal entry",
        };
        f.write_str(name)
    }
}

/// Errors produced by the meal planner.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced record does not exist
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Which table the id points into
        entity: EntityKind,
        /// The dangling id
        id: i64,
    },

    /// Stored data violates an invariant (e.g. a cycle in the tag hierarchy)
    #[error("Data integrity error: {detail}")]
    DataIntegrity {
        /// What was found to be inconsistent
        detail: String,
    },

    /// Input was rejected before touching the database
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// The template cannot be used for the requested slot
    #[error("Meal template '{template}' is not compatible with slot '{slot}'")]
    IncompatibleSlot {
        /// Template name
        template: String,
        /// Requested slot
        slot: SlotType,
    },

    /// Catalog file or environment configuration problem
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    /// Error returned by `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] error.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`] error.
    pub(crate) const fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
