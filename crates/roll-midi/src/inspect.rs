use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tempo change in the conductor track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoEvent {
    pub tick: u64,
    pub bpm: f64,
}

/// NoteOn velocities indexed by absolute tick, then MIDI key.
pub type VelocityIndex = HashMap<u64, HashMap<u8, u8>>;

/// Ticks per quarter note from the file header.
pub fn tpq(midi_bytes: &[u8]) -> crate::Result<u16> {
    let smf = parse(midi_bytes)?;
    match smf.header.timing {
        midly::Timing::Metrical(ticks) => Ok(ticks.as_int()),
        midly::Timing::Timecode(_, _) => Err(crate::Error::TimecodeTiming),
    }
}

/// Tempo events from track 0, in file order with absolute ticks.
pub fn tempo_map(midi_bytes: &[u8]) -> crate::Result<Vec<TempoEvent>> {
    let smf = parse(midi_bytes)?;

    let mut events = Vec::new();
    let Some(conductor) = smf.tracks.first() else {
        return Ok(events);
    };

    let mut current_tick: u64 = 0;
    for event in conductor {
        current_tick += event.delta.as_int() as u64;
        if let TrackEventKind::Meta(MetaMessage::Tempo(tempo)) = event.kind {
            let usec = tempo.as_int();
            events.push(TempoEvent {
                tick: current_tick,
                bpm: 60_000_000.0 / usec as f64,
            });
        }
    }

    Ok(events)
}

/// Collect NoteOn velocities from the note tracks that follow the conductor
/// track. Later tracks win ties at the same (tick, key).
///
/// Velocities of 0 and 1 are skipped: 0 is a NoteOff in disguise, and the
/// expression renderer emits velocity-1 events that carry no dynamics.
pub fn velocity_index(midi_bytes: &[u8], note_tracks: usize) -> crate::Result<VelocityIndex> {
    let smf = parse(midi_bytes)?;

    let mut index = VelocityIndex::new();
    for track in smf.tracks.iter().skip(1).take(note_tracks) {
        let mut current_tick: u64 = 0;
        for event in track {
            current_tick += event.delta.as_int() as u64;
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } = event.kind
            {
                if vel.as_int() > 1 {
                    index
                        .entry(current_tick)
                        .or_default()
                        .insert(key.as_int(), vel.as_int());
                }
            }
        }
    }

    Ok(index)
}

fn parse(midi_bytes: &[u8]) -> crate::Result<Smf<'_>> {
    Smf::parse(midi_bytes).map_err(|e| crate::Error::MidiParse(e.to_string()))
}
