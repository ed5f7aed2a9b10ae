//! Roll types: the tracker-bar format a roll was punched for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The format of a roll, as recorded in its MODS record.
///
/// Serializes to the strings the playback application keys its expression
/// emulation off of (`welte-red`, `88-note`, ...). Rolls whose records name
/// no recognizable format carry `NA`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollType {
    #[serde(rename = "welte-red")]
    WelteRed,
    #[serde(rename = "welte-green")]
    WelteGreen,
    #[serde(rename = "welte-licensee")]
    WelteLicensee,
    #[serde(rename = "duo-art")]
    DuoArt,
    #[serde(rename = "88-note")]
    EightyEightNote,
    #[serde(rename = "65-note")]
    SixtyFiveNote,
    #[default]
    #[serde(rename = "NA")]
    Unknown,
}

impl RollType {
    /// Map the text of a MODS note to a roll type.
    ///
    /// Cataloging practice has varied over the years; trailing periods come
    /// and go between records, so they are ignored.
    pub fn from_note(note: &str) -> Option<RollType> {
        match note.trim().trim_end_matches('.') {
            "Welte-Mignon red roll (T-100)" => Some(RollType::WelteRed),
            "Welte-Mignon green roll (T-98)" => Some(RollType::WelteGreen),
            "Welte-Mignon licensee roll" | "Welte-Mignon licensee roll (T-98)" => {
                Some(RollType::WelteLicensee)
            }
            "Duo-Art piano rolls" => Some(RollType::DuoArt),
            "Scale: 88n" | "88n" | "standard" | "non-reproducing" => {
                Some(RollType::EightyEightNote)
            }
            "Scale: 65n" | "65n" => Some(RollType::SixtyFiveNote),
            _ => None,
        }
    }

    /// The serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            RollType::WelteRed => "welte-red",
            RollType::WelteGreen => "welte-green",
            RollType::WelteLicensee => "welte-licensee",
            RollType::DuoArt => "duo-art",
            RollType::EightyEightNote => "88-note",
            RollType::SixtyFiveNote => "65-note",
            RollType::Unknown => "NA",
        }
    }

    /// 65-note rolls have no expression rendering of their own; the note
    /// realization stands in for it.
    pub fn is_65_note(&self) -> bool {
        matches!(self, RollType::SixtyFiveNote)
    }

    /// Number of note-carrying tracks in an expressive realization (after
    /// the conductor track): bass and treble, except on 65-note rolls.
    pub fn note_tracks(&self) -> usize {
        if self.is_65_note() {
            1
        } else {
            2
        }
    }
}

impl fmt::Display for RollType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_note_exact() {
        assert_eq!(
            RollType::from_note("Welte-Mignon red roll (T-100)"),
            Some(RollType::WelteRed)
        );
        assert_eq!(RollType::from_note("Duo-Art piano rolls"), Some(RollType::DuoArt));
        assert_eq!(RollType::from_note("88n"), Some(RollType::EightyEightNote));
        assert_eq!(RollType::from_note("Scale: 65n"), Some(RollType::SixtyFiveNote));
    }

    #[test]
    fn test_from_note_trailing_periods() {
        assert_eq!(
            RollType::from_note("Welte-Mignon red roll (T-100).."),
            Some(RollType::WelteRed)
        );
        assert_eq!(
            RollType::from_note("Welte-Mignon licensee roll (T-98)."),
            Some(RollType::WelteLicensee)
        );
        assert_eq!(RollType::from_note("Scale: 88n."), Some(RollType::EightyEightNote));
    }

    #[test]
    fn test_from_note_generic_markers() {
        assert_eq!(RollType::from_note("standard"), Some(RollType::EightyEightNote));
        assert_eq!(
            RollType::from_note("non-reproducing"),
            Some(RollType::EightyEightNote)
        );
    }

    #[test]
    fn test_from_note_unrecognized() {
        assert_eq!(RollType::from_note("Hupfeld Phonola"), None);
        assert_eq!(RollType::from_note(""), None);
    }

    #[test]
    fn test_serialized_form() {
        let json = serde_json::to_string(&RollType::WelteLicensee).unwrap();
        assert_eq!(json, "\"welte-licensee\"");
        let json = serde_json::to_string(&RollType::Unknown).unwrap();
        assert_eq!(json, "\"NA\"");
        let restored: RollType = serde_json::from_str("\"65-note\"").unwrap();
        assert_eq!(restored, RollType::SixtyFiveNote);
    }

    #[test]
    fn test_note_tracks() {
        assert_eq!(RollType::WelteRed.note_tracks(), 2);
        assert_eq!(RollType::SixtyFiveNote.note_tracks(), 1);
    }
}
