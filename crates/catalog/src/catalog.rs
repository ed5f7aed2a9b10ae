use crate::document::RollDocument;
use mods::{Druid, RollType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One roll's row in `catalog.json`. Fields are declared alphabetically
/// because the file is emitted with sorted keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub arranger: String,
    pub composer: String,
    pub druid: Druid,
    pub image_url: Option<String>,
    pub number: Option<String>,
    pub performer: String,
    pub publisher: Option<String>,
    pub title: String,
    #[serde(rename = "type")]
    pub roll_type: RollType,
    pub work: String,
}

impl CatalogEntry {
    pub fn from_document(druid: Druid, doc: &RollDocument) -> Self {
        Self {
            arranger: doc.for_catalog.arranger.clone(),
            composer: doc.for_catalog.composer.clone(),
            druid,
            image_url: doc.image_url.clone(),
            number: doc.number.clone(),
            performer: doc.for_catalog.performer.clone(),
            publisher: doc.publisher.clone(),
            title: doc.searchtitle.clone(),
            roll_type: doc.roll_type,
            work: doc.for_catalog.work.clone(),
        }
    }
}

/// Write the consolidated catalog: entries sorted by title, two-space
/// indented JSON, trailing newline. Sorts the slice in place.
pub fn write_catalog(entries: &mut [CatalogEntry], path: &Path) -> crate::Result<()> {
    entries.sort_by(|a, b| a.title.cmp(&b.title));

    let mut body = serde_json::to_vec_pretty(&entries)?;
    body.push(b'\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)?;
    Ok(())
}
