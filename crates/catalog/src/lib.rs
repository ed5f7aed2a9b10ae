//! Output documents for the player app: one JSON file per roll, plus the
//! consolidated `catalog.json` the search bar loads.
//!
//! Field order in the emitted JSON is part of the interface. The per-roll
//! document keeps metadata first and the large `holeData` array last so the
//! files stay diffable; the catalog is sorted by title with alphabetical
//! keys so regeneration produces stable diffs in the published repo.

pub mod catalog;
pub mod document;
pub mod roster;

pub use catalog::{write_catalog, CatalogEntry};
pub use document::{HoleEntry, RollDocument};
pub use roster::{resolve, RosterRequest};

use std::path::PathBuf;

/// Errors from document and roster handling.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster file not found: {0}")]
    RosterNotFound(PathBuf),
    #[error("no \"Druid\" column in {0}")]
    MissingDruidColumn(PathBuf),
    #[error(transparent)]
    Druid(#[from] mods::DruidError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
