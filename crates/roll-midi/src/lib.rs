//! Read-only introspection of the MIDI files emitted by the roll production
//! pipeline.
//!
//! Two realizations exist per roll: a "note" MIDI holding the raw hole
//! punches, and an "exp" MIDI with expression applied. This crate pulls
//! timing facts (ticks per quarter, tempo map) from the note file and
//! aligns the expressive NoteOn velocities back onto the scanned holes,
//! keyed by the hole's pixel row relative to the first music row. The
//! roll scanners emit images at a resolution where one pixel row equals
//! one MIDI tick, which is what makes that alignment possible.

pub mod align;
pub mod inspect;

pub use align::merge_velocities;
pub use inspect::{tempo_map, tpq, velocity_index, TempoEvent, VelocityIndex};

/// Errors from MIDI introspection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MIDI parse error: {0}")]
    MidiParse(String),
    #[error("MIDI file uses SMPTE timecode timing, expected metrical")]
    TimecodeTiming,
}

pub type Result<T> = std::result::Result<T, Error>;
