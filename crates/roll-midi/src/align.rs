use crate::inspect::VelocityIndex;
use aton::Hole;

/// Attach expressive velocities to scanned holes.
///
/// A hole's tick in the MIDI file is its origin row minus the first music
/// row of the scan. Holes above the first music row, or whose key falls
/// outside MIDI range, never match and keep `velocity: None`.
pub fn merge_velocities(holes: &mut [Hole], first_hole_px: i64, index: &VelocityIndex) {
    for hole in holes {
        let Ok(tick) = u64::try_from(hole.origin_row - first_hole_px) else {
            continue;
        };
        let Ok(key) = u8::try_from(hole.midi_key) else {
            continue;
        };
        if let Some(vel) = index.get(&tick).and_then(|at_tick| at_tick.get(&key)) {
            hole.velocity = Some(*vel);
        }
    }
}
