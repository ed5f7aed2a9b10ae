//! Rosters: which rolls to process.
//!
//! A roster arrives one of four ways, in precedence order: DRUIDs given
//! directly, a CSV file with a "Druid" column, a plain text file with one
//! DRUID per line, or a scan of a druids directory for both kinds of file.
//! An explicitly named file that does not exist is an error; later sources
//! are never consulted as a fallback.

use crate::CatalogError;
use mods::Druid;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Load DRUIDs from the "Druid" column of a CSV file. Rows with invalid
/// values are skipped with a warning.
pub fn druids_from_csv(path: &Path) -> crate::Result<Vec<Druid>> {
    if !path.exists() {
        return Err(CatalogError::RosterNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let column = reader
        .headers()?
        .iter()
        .position(|h| h == "Druid")
        .ok_or_else(|| CatalogError::MissingDruidColumn(path.to_path_buf()))?;

    let mut druids = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(raw) = record.get(column) else {
            continue;
        };
        match raw.parse::<Druid>() {
            Ok(druid) => druids.push(druid),
            Err(e) => warn!("skipping row in {}: {}", path.display(), e),
        }
    }
    Ok(druids)
}

/// Load DRUIDs from a text file, one per line. Blank lines and invalid
/// values are skipped, the latter with a warning.
pub fn druids_from_txt(path: &Path) -> crate::Result<Vec<Druid>> {
    if !path.exists() {
        return Err(CatalogError::RosterNotFound(path.to_path_buf()));
    }

    let mut druids = Vec::new();
    for line in fs::read_to_string(path)?.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Druid>() {
            Ok(druid) => druids.push(druid),
            Err(e) => warn!("skipping line in {}: {}", path.display(), e),
        }
    }
    Ok(druids)
}

/// Scan a directory for roster files: every `*.csv` first, then every
/// `*.txt`, each group in filename order. A missing directory yields an
/// empty roster.
pub fn druids_from_dir(dir: &Path) -> crate::Result<Vec<Druid>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut druids = Vec::new();
    for extension in ["csv", "txt"] {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
            .collect();
        files.sort();

        for file in files {
            match extension {
                "csv" => druids.extend(druids_from_csv(&file)?),
                _ => druids.extend(druids_from_txt(&file)?),
            }
        }
    }
    Ok(druids)
}

/// Where the roster should come from.
#[derive(Debug, Clone, Default)]
pub struct RosterRequest {
    /// DRUIDs given directly, still unvalidated.
    pub druids: Vec<String>,
    pub csv_file: Option<PathBuf>,
    pub txt_file: Option<PathBuf>,
    /// Directory scanned when nothing else was given.
    pub scan_dir: PathBuf,
}

/// Resolve a request into a validated roster. Directly given DRUIDs fail
/// hard on a bad value, since the caller typed them.
pub fn resolve(request: &RosterRequest) -> crate::Result<Vec<Druid>> {
    if !request.druids.is_empty() {
        return request
            .druids
            .iter()
            .map(|raw| raw.parse::<Druid>().map_err(CatalogError::from))
            .collect();
    }
    if let Some(csv_file) = &request.csv_file {
        return druids_from_csv(csv_file);
    }
    if let Some(txt_file) = &request.txt_file {
        return druids_from_txt(txt_file);
    }
    druids_from_dir(&request.scan_dir)
}
