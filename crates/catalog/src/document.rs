use aton::{Hole, RollGeometry};
use mods::{CatalogCredits, RefinedMetadata, RollType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One hole in the player's coordinate scheme. Keys are single letters
/// because tens of thousands of these land in every roll document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleEntry {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    /// Hole height, off row minus origin row.
    pub h: i64,
    pub m: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub v: Option<u8>,
}

impl From<&Hole> for HoleEntry {
    fn from(hole: &Hole) -> Self {
        Self {
            x: hole.origin_col,
            y: hole.origin_row,
            w: hole.width_col,
            h: hole.off_time - hole.origin_row,
            m: hole.midi_key,
            v: hole.velocity,
        }
    }
}

/// The per-roll JSON document, serialized in declaration order.
///
/// Bibliographic fields are always present (null when unknown). The scan
/// geometry fields only appear when the hole report supplied them, and
/// `tempoMap` only appears when tempo maps were requested. `holeData` is
/// always present so the player can distinguish "no report" (null) from
/// "report with no playable holes" would-be edge cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollDocument {
    pub title_prefix: Option<String>,
    pub title: Option<String>,
    pub title_part_number: Option<String>,
    pub title_part_name: Option<String>,
    pub subtitle: Option<String>,
    pub composer: Option<String>,
    pub performer: Option<String>,
    pub arranger: Option<String>,
    pub original_composer: Option<String>,
    pub label: Option<String>,
    pub publisher: Option<String>,
    pub number: Option<String>,
    pub publish_date: Option<String>,
    pub publish_place: Option<String>,
    pub recording_date: Option<String>,
    #[serde(rename = "type")]
    pub roll_type: RollType,
    #[serde(rename = "PURL")]
    pub purl: String,
    pub image_url: Option<String>,
    pub searchtitle: String,
    pub for_catalog: CatalogCredits,
    #[serde(rename = "NOTE_MIDI_TPQ")]
    pub note_midi_tpq: u16,
    #[serde(rename = "tempoMap", skip_serializing_if = "Option::is_none", default)]
    pub tempo_map: Option<Vec<(u64, f64)>>,
    #[serde(
        rename = "AVG_HOLE_WIDTH",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub avg_hole_width: Option<String>,
    #[serde(rename = "FIRST_HOLE", skip_serializing_if = "Option::is_none", default)]
    pub first_hole: Option<String>,
    #[serde(rename = "IMAGE_WIDTH", skip_serializing_if = "Option::is_none", default)]
    pub image_width: Option<String>,
    #[serde(
        rename = "IMAGE_LENGTH",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub image_length: Option<String>,
    #[serde(rename = "holeData")]
    pub hole_data: Option<Vec<HoleEntry>>,
}

impl RollDocument {
    /// Start a document from refined metadata and the note MIDI's ticks per
    /// quarter. Scan geometry and hole data come later via [`set_report`].
    ///
    /// [`set_report`]: RollDocument::set_report
    pub fn new(refined: &RefinedMetadata, note_midi_tpq: u16) -> Self {
        let meta = &refined.meta;
        Self {
            title_prefix: meta.title_prefix.clone(),
            title: meta.title.clone(),
            title_part_number: meta.title_part_number.clone(),
            title_part_name: meta.title_part_name.clone(),
            subtitle: meta.subtitle.clone(),
            composer: meta.composer.clone(),
            performer: meta.performer.clone(),
            arranger: meta.arranger.clone(),
            original_composer: meta.original_composer.clone(),
            label: meta.label.clone(),
            publisher: meta.publisher.clone(),
            number: meta.number.clone(),
            publish_date: meta.publish_date.clone(),
            publish_place: meta.publish_place.clone(),
            recording_date: meta.recording_date.clone(),
            roll_type: meta.roll_type,
            purl: meta.purl.clone(),
            image_url: meta.image_url.clone(),
            searchtitle: refined.search_title.clone(),
            for_catalog: refined.for_catalog.clone(),
            note_midi_tpq,
            tempo_map: None,
            avg_hole_width: None,
            first_hole: None,
            image_width: None,
            image_length: None,
            hole_data: None,
        }
    }

    /// Fold a parsed hole report into the document. An empty hole list keeps
    /// `holeData` null, matching a roll with no report at all.
    pub fn set_report(&mut self, geometry: &RollGeometry, holes: &[Hole]) {
        self.avg_hole_width = geometry.avg_hole_width.clone();
        self.first_hole = geometry.first_hole.clone();
        self.image_width = geometry.image_width.clone();
        self.image_length = geometry.image_length.clone();
        self.hole_data = if holes.is_empty() {
            None
        } else {
            Some(holes.iter().map(HoleEntry::from).collect())
        };
    }

    /// Write the document as compact JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec(self)?)?;
        Ok(())
    }
}
