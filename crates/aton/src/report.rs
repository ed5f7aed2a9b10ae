//! Report structure and the line parser.

use serde::{Deserialize, Serialize};

/// Roll-level scan facts, kept as the pixel strings the report gave us (the
/// consuming application does its own unit handling).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollGeometry {
    pub avg_hole_width: Option<String>,
    pub first_hole: Option<String>,
    pub image_width: Option<String>,
    pub image_length: Option<String>,
}

impl RollGeometry {
    /// First music row of the scan as a pixel offset, when the report both
    /// has the value and it parses cleanly.
    pub fn first_hole_px(&self) -> Option<i64> {
        self.first_hole.as_deref()?.trim().parse().ok()
    }
}

/// One note hole, in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hole {
    pub origin_col: i64,
    pub origin_row: i64,
    pub width_col: i64,
    pub off_time: i64,
    pub midi_key: i64,
    /// NoteOn velocity aligned from the expressive realization, filled in
    /// after parsing.
    pub velocity: Option<u8>,
}

/// A parsed hole-analysis report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoleReport {
    pub geometry: RollGeometry,
    /// Playable holes, in report order. Control holes (no `NOTE_ATTACK`)
    /// and holes with non-positive durations are dropped.
    pub holes: Vec<Hole>,
    pub dropped: usize,
    /// Oddities encountered while parsing, for the caller to log.
    pub warnings: Vec<String>,
}

const ROLL_KEYS: [&str; 4] = ["AVG_HOLE_WIDTH", "FIRST_HOLE", "IMAGE_WIDTH", "IMAGE_LENGTH"];

/// Parse a report. Never fails: a truncated or garbled file yields whatever
/// could be read, with warnings.
pub fn parse(input: &str) -> HoleReport {
    let mut report = HoleReport::default();
    let mut lines = input.lines();

    // Roll-level attributes run until the HOLES section opens
    for line in lines.by_ref() {
        let line = line.trim_end();
        if line == "@@BEGIN: HOLES" {
            break;
        }
        if let Some((key, value)) = attr_line(line) {
            if !ROLL_KEYS.contains(&key) {
                continue;
            }
            let value = value.replace("px", "").trim().to_string();
            match key {
                "AVG_HOLE_WIDTH" => report.geometry.avg_hole_width = Some(value),
                "FIRST_HOLE" => report.geometry.first_hole = Some(value),
                "IMAGE_WIDTH" => report.geometry.image_width = Some(value),
                "IMAGE_LENGTH" => report.geometry.image_length = Some(value),
                _ => {}
            }
        }
    }

    // Hole records continue through the BADHOLES section, which always
    // follows HOLES when present.
    let mut pending: Option<PendingHole> = None;
    for line in lines {
        let line = line.trim_end();
        if line == "@@END: BADHOLES" {
            break;
        }
        if line == "@@BEGIN: HOLE" {
            pending = Some(PendingHole::default());
            continue;
        }
        if line == "@@END: HOLE" {
            if let Some(hole) = pending.take() {
                report.finish_hole(hole);
            }
            continue;
        }
        if let Some(hole) = pending.as_mut() {
            if let Some((key, value)) = attr_line(line) {
                hole.set(key, value, &mut report.warnings);
            }
        }
    }

    report
}

/// Split an `@KEY: value` attribute line. Section markers (`@@...`) and
/// lines without a separating space do not count.
fn attr_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('@')?;
    if rest.starts_with('@') {
        return None;
    }
    let (key, value) = rest.split_once(':')?;
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    let value = value.strip_prefix(char::is_whitespace)?;
    Some((key, value.trim()))
}

fn parse_px_int(value: &str) -> Option<i64> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}

/// Accumulates attribute lines between `@@BEGIN: HOLE` and `@@END: HOLE`.
#[derive(Debug, Default)]
struct PendingHole {
    note_attack: Option<i64>,
    width_col: Option<i64>,
    origin_col: Option<i64>,
    origin_row: Option<i64>,
    off_time: Option<i64>,
    midi_key: Option<i64>,
}

impl PendingHole {
    fn set(&mut self, key: &str, value: &str, warnings: &mut Vec<String>) {
        let slot = match key {
            "NOTE_ATTACK" => &mut self.note_attack,
            "WIDTH_COL" => &mut self.width_col,
            "ORIGIN_COL" => &mut self.origin_col,
            "ORIGIN_ROW" => &mut self.origin_row,
            "OFF_TIME" => &mut self.off_time,
            "MIDI_KEY" => &mut self.midi_key,
            _ => return,
        };
        match parse_px_int(value) {
            Some(parsed) => *slot = Some(parsed),
            None => warnings.push(format!("unparseable {key} value {value:?}")),
        }
    }
}

impl HoleReport {
    fn finish_hole(&mut self, hole: PendingHole) {
        // Control holes (pedals, rewind) carry no NOTE_ATTACK and do not
        // sound; they are counted but not kept.
        let Some(attack) = hole.note_attack else {
            self.dropped += 1;
            return;
        };
        let (
            Some(origin_col),
            Some(origin_row),
            Some(width_col),
            Some(off_time),
            Some(midi_key),
        ) = (
            hole.origin_col,
            hole.origin_row,
            hole.width_col,
            hole.off_time,
            hole.midi_key,
        )
        else {
            self.warnings.push("incomplete hole record".to_string());
            self.dropped += 1;
            return;
        };
        if attack != origin_row {
            self.warnings
                .push(format!("NOTE_ATTACK {attack} disagrees with ORIGIN_ROW {origin_row}"));
        }
        if origin_row >= off_time {
            // Non-positive duration, nothing to highlight
            self.dropped += 1;
            return;
        }
        self.holes.push(Hole {
            origin_col,
            origin_row,
            width_col,
            off_time,
            midi_key,
            velocity: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
@ROLL_TYPE: welte-red
@AVG_HOLE_WIDTH: 17.5px
@FIRST_HOLE: 482px
@IMAGE_WIDTH: 3037px
@IMAGE_LENGTH: 98765px
@HARD_MARGIN_BASS: 59px
@@BEGIN: HOLES
@@BEGIN: HOLE
@NOTE_ATTACK: 1000px
@WIDTH_COL: 16px
@ORIGIN_COL: 240px
@ORIGIN_ROW: 1000px
@OFF_TIME: 1100px
@MIDI_KEY: 64
@TRACKER_HOLE: 22
@@END: HOLE
@@BEGIN: HOLE
@WIDTH_COL: 16px
@ORIGIN_COL: 300px
@ORIGIN_ROW: 1200px
@MIDI_KEY: 0
@@END: HOLE
@@END: HOLES
@@BEGIN: BADHOLES
@@BEGIN: HOLE
@NOTE_ATTACK: 2000px
@WIDTH_COL: 14px
@ORIGIN_COL: 500px
@ORIGIN_ROW: 2000px
@OFF_TIME: 2080px
@MIDI_KEY: 72
@@END: HOLE
@@BEGIN: HOLE
@NOTE_ATTACK: 2500px
@WIDTH_COL: 14px
@ORIGIN_COL: 520px
@ORIGIN_ROW: 2500px
@OFF_TIME: 2400px
@MIDI_KEY: 73
@@END: HOLE
@@END: BADHOLES
@@BEGIN: SOMETHING_ELSE
@IGNORED: 5px
";

    #[test]
    fn test_geometry_px_stripped() {
        let report = parse(SAMPLE);
        assert_eq!(report.geometry.avg_hole_width.as_deref(), Some("17.5"));
        assert_eq!(report.geometry.first_hole.as_deref(), Some("482"));
        assert_eq!(report.geometry.image_width.as_deref(), Some("3037"));
        assert_eq!(report.geometry.image_length.as_deref(), Some("98765"));
        assert_eq!(report.geometry.first_hole_px(), Some(482));
    }

    #[test]
    fn test_holes_include_badholes_section() {
        let report = parse(SAMPLE);
        // Note hole from HOLES plus the valid bad hole; the control hole and
        // the non-positive-duration hole are dropped.
        assert_eq!(report.holes.len(), 2);
        assert_eq!(report.dropped, 2);
        assert!(report.warnings.is_empty());

        assert_eq!(
            report.holes[0],
            Hole {
                origin_col: 240,
                origin_row: 1000,
                width_col: 16,
                off_time: 1100,
                midi_key: 64,
                velocity: None,
            }
        );
        assert_eq!(report.holes[1].midi_key, 72);
    }

    #[test]
    fn test_nothing_parsed_after_badholes_end() {
        let report = parse(SAMPLE);
        // The SOMETHING_ELSE section after @@END: BADHOLES is never read
        assert!(report.holes.iter().all(|h| h.midi_key != 5));
    }

    #[test]
    fn test_attack_mismatch_warns_but_keeps_hole() {
        let input = "\
@@BEGIN: HOLES
@@BEGIN: HOLE
@NOTE_ATTACK: 999px
@WIDTH_COL: 16px
@ORIGIN_COL: 240px
@ORIGIN_ROW: 1000px
@OFF_TIME: 1100px
@MIDI_KEY: 64
@@END: HOLE
@@END: BADHOLES
";
        let report = parse(input);
        assert_eq!(report.holes.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("NOTE_ATTACK"));
    }

    #[test]
    fn test_incomplete_hole_dropped_with_warning() {
        let input = "\
@@BEGIN: HOLES
@@BEGIN: HOLE
@NOTE_ATTACK: 1000px
@ORIGIN_ROW: 1000px
@@END: HOLE
@@END: BADHOLES
";
        let report = parse(input);
        assert!(report.holes.is_empty());
        assert_eq!(report.dropped, 1);
        assert_eq!(report.warnings, vec!["incomplete hole record".to_string()]);
    }

    #[test]
    fn test_unparseable_value_warns() {
        let input = "\
@@BEGIN: HOLES
@@BEGIN: HOLE
@NOTE_ATTACK: garbage
@@END: HOLE
@@END: BADHOLES
";
        let report = parse(input);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("NOTE_ATTACK"));
        // With NOTE_ATTACK unparsed the record reads as a control hole
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_truncated_file_keeps_what_was_read() {
        let input = "\
@FIRST_HOLE: 482px
@@BEGIN: HOLES
@@BEGIN: HOLE
@NOTE_ATTACK: 1000px
@WIDTH_COL: 16px
@ORIGIN_COL: 240px
@ORIGIN_ROW: 1000px
@OFF_TIME: 1100px
@MIDI_KEY: 64
@@END: HOLE
@@BEGIN: HOLE
@NOTE_ATTACK: 1200px
";
        let report = parse(input);
        // The complete hole survives; the one cut off mid-record does not
        assert_eq!(report.holes.len(), 1);
        assert_eq!(report.geometry.first_hole_px(), Some(482));
    }

    #[test]
    fn test_empty_input() {
        let report = parse("");
        assert_eq!(report, HoleReport::default());
    }

    #[test]
    fn test_attr_line_shapes() {
        assert_eq!(attr_line("@KEY: value"), Some(("KEY", "value")));
        assert_eq!(attr_line("@KEY:  12px "), Some(("KEY", "12px")));
        // Section markers, missing separators, and spaced keys do not parse
        assert_eq!(attr_line("@@BEGIN: HOLES"), None);
        assert_eq!(attr_line("@KEY:no-space"), None);
        assert_eq!(attr_line("@BAD KEY: value"), None);
        assert_eq!(attr_line("plain text"), None);
    }
}
