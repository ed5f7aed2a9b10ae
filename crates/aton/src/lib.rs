//! Parser for @ATON roll image analysis reports.
//!
//! The roll scanning toolchain writes one report per roll: `@KEY: value`
//! attribute lines describing the scan, then hole records bracketed by
//! `@@BEGIN:`/`@@END:` section markers.
//!
//! ```text
//! @AVG_HOLE_WIDTH: 17.5px
//! @FIRST_HOLE: 482px
//! @@BEGIN: HOLES
//! @@BEGIN: HOLE
//! @NOTE_ATTACK: 1000px
//! @ORIGIN_ROW: 1000px
//! @OFF_TIME: 1100px
//! ...
//! @@END: HOLE
//! @@END: HOLES
//! @@BEGIN: BADHOLES
//! ...
//! @@END: BADHOLES
//! ```
//!
//! This is a generous parser: malformed lines and holes produce warnings in
//! the returned report rather than failures, since a single odd hole should
//! never block a roll from being published. Holes marked BAD by the scanner
//! are still interpreted as note or control holes in the realization, so the
//! BADHOLES section is parsed the same as HOLES.

pub mod report;

pub use report::{parse, Hole, HoleReport, RollGeometry};
