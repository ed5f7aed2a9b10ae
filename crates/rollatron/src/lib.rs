//! Pipeline steps behind the `rollatron` binary.
//!
//! The pipeline turns scanned piano rolls into the data files the
//! Pianolatron player consumes. Each step stands alone:
//!
//! - [`sync`]: clone or update the roll production repository and stage
//!   its MIDI realizations and hole-analysis reports locally
//! - [`build`]: per roll, fetch and refine MODS metadata, relocate the
//!   MIDI files, fold in the hole report, and write the JSON document;
//!   then regenerate the consolidated catalog
//! - publishing lives in the `rollpub` crate; [`pipeline`] chains all
//!   three for the scheduled regeneration job
//!
//! A roll that cannot be built (missing metadata, missing MIDI) is logged
//! and skipped so one withdrawn record never blocks the rest of the run.

pub mod build;
pub mod fetch;
pub mod pipeline;
pub mod sync;

pub use build::{build, BuildOptions, BuildOutcome};
pub use fetch::MetadataFetcher;
pub use sync::{sync, SyncReport};
