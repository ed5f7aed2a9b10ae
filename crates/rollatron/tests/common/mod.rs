//! Fixture builders shared by the pipeline integration tests.

use rollconf::RollConfig;
use std::path::Path;

pub const DRUID: &str = "zb497jz4405";
pub const DUO_ART: &str = r#"<note displayLabel="Roll type">Duo-Art piano rolls.</note>"#;

/// A minimal PURL public object: one image resource plus a MODS record
/// with a primary title, composer, performer, roll number, publication
/// info, and the given physical-description note.
pub fn object_xml(druid: &str, roll_note: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<publicObject id="druid:{druid}" published="2021-06-08">
  <contentMetadata objectId="{druid}" type="image">
    <resource sequence="1" type="image">
      <label>Image 1</label>
      <file id="{druid}_0001.jp2" mimetype="image/jp2" size="181248954"/>
    </resource>
  </contentMetadata>
  <mods xmlns="http://www.loc.gov/mods/v3" version="3.6">
    <titleInfo usage="primary">
      <nonSort>The</nonSort>
      <title>ROBIN'S RETURN</title>
    </titleInfo>
    <name type="personal" usage="primary">
      <namePart>Fisher, Leander</namePart>
      <role><roleTerm type="text">composer</roleTerm></role>
    </name>
    <name type="personal">
      <namePart>Bauer, Harold</namePart>
      <role><roleTerm type="text">instrumentalist</roleTerm></role>
    </name>
    <identifier type="issue number" displayLabel="Roll number">6926</identifier>
    <originInfo eventType="publication">
      <publisher>Aeolian Company</publisher>
      <dateIssued keyDate="yes">1918</dateIssued>
    </originInfo>
    <physicalDescription>
      {roll_note}
    </physicalDescription>
  </mods>
</publicObject>
"#
    )
}

/// Format-1 file shaped like a roll realization: conductor track with two
/// tempo events, then bass and treble note tracks.
pub fn roll_midi_bytes() -> Vec<u8> {
    let mut buf = Vec::new();

    buf.extend_from_slice(b"MThd");
    buf.extend_from_slice(&6u32.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&3u16.to_be_bytes());
    buf.extend_from_slice(&358u16.to_be_bytes());

    // Conductor: 120 BPM at tick 0, 100 BPM at tick 200
    let mut track0 = Vec::new();
    track0.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    track0.extend_from_slice(&[0x81, 0x48, 0xFF, 0x51, 0x03, 0x09, 0x27, 0xC0]);
    track0.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    buf.extend_from_slice(b"MTrk");
    buf.extend_from_slice(&(track0.len() as u32).to_be_bytes());
    buf.extend_from_slice(&track0);

    // Bass: note 40 velocity 64 at tick 100, then a velocity-1 event on
    // note 41 at tick 300
    let mut track1 = Vec::new();
    track1.extend_from_slice(&[0x64, 0x90, 40, 64]);
    track1.extend_from_slice(&[0x60, 0x80, 40, 0]);
    track1.extend_from_slice(&[0x68, 0x90, 41, 1]);
    track1.extend_from_slice(&[0x10, 0x80, 41, 0]);
    track1.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    buf.extend_from_slice(b"MTrk");
    buf.extend_from_slice(&(track1.len() as u32).to_be_bytes());
    buf.extend_from_slice(&track1);

    // Treble: note 72 velocity 90 at tick 100
    let mut track2 = Vec::new();
    track2.extend_from_slice(&[0x64, 0x90, 72, 90]);
    track2.extend_from_slice(&[0x60, 0x80, 72, 0]);
    track2.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    buf.extend_from_slice(b"MTrk");
    buf.extend_from_slice(&(track2.len() as u32).to_be_bytes());
    buf.extend_from_slice(&track2);

    buf
}

/// Three holes: two at pixel row 400 (tick 100, where the realization has
/// velocities) and one at row 600 (tick 300, where it has only the
/// velocity-1 event).
pub const HOLE_REPORT: &str = "\
@ROLL_TYPE: duo-art
@AVG_HOLE_WIDTH: 17.5px
@FIRST_HOLE: 300px
@IMAGE_WIDTH: 3037px
@IMAGE_LENGTH: 90000px
@@BEGIN: HOLES
@@BEGIN: HOLE
@NOTE_ATTACK: 400px
@WIDTH_COL: 16px
@ORIGIN_COL: 240px
@ORIGIN_ROW: 400px
@OFF_TIME: 500px
@MIDI_KEY: 40
@@END: HOLE
@@BEGIN: HOLE
@NOTE_ATTACK: 400px
@WIDTH_COL: 16px
@ORIGIN_COL: 1800px
@ORIGIN_ROW: 400px
@OFF_TIME: 480px
@MIDI_KEY: 72
@@END: HOLE
@@BEGIN: HOLE
@NOTE_ATTACK: 600px
@WIDTH_COL: 16px
@ORIGIN_COL: 260px
@ORIGIN_ROW: 600px
@OFF_TIME: 680px
@MIDI_KEY: 41
@@END: HOLE
@@END: HOLES
@@BEGIN: BADHOLES
@@END: BADHOLES
";

pub fn write(path: std::path::PathBuf, content: impl AsRef<[u8]>) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

pub fn test_config(root: &Path) -> RollConfig {
    let mut config = RollConfig::default();
    config.paths.root = root.to_path_buf();
    config.build.skip = Vec::new();
    // Unroutable base: a test that misses the cache fails fast instead of
    // reaching the real service
    config.metadata.purl_base = "http://127.0.0.1:9/".to_string();
    config
}
