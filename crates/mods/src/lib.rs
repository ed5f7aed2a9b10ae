//! MODS metadata for piano rolls.
//!
//! The Stanford Digital Repository publishes a public object XML for every
//! scanned roll; the MODS record embedded in it carries the bibliographic
//! fields the catalog needs. This crate pulls those fields out of the record
//! ([`extract`]) and massages them into presentation form ([`refine`]):
//! display titles, search strings, and catalog credits.
//!
//! Cataloging practice for the rolls has shifted repeatedly over the years,
//! so most fields are resolved through chains of fallback locations; the
//! first location that yields a value wins.

pub mod druid;
pub mod extract;
pub mod refine;
pub mod roll_type;

pub use druid::{Druid, DruidError};
pub use extract::{extract, RollMetadata};
pub use refine::{refine, CatalogCredits, RefinedMetadata};
pub use roll_type::RollType;

use thiserror::Error;

/// Errors from MODS record handling.
#[derive(Debug, Error)]
pub enum ModsError {
    /// The object XML carried no `<mods>` element, which usually means the
    /// record was withdrawn or the DRUID is wrong.
    #[error("no MODS record in object XML for {0}")]
    NoModsRecord(Druid),

    #[error("unable to parse MODS record for {druid}: {message}")]
    Parse { druid: Druid, message: String },

    /// A record without a title cannot be cataloged.
    #[error("MODS record for {0} has no title")]
    MissingTitle(Druid),
}
