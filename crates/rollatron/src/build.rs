use anyhow::{bail, Context, Result};
use catalog::{write_catalog, CatalogEntry, RollDocument};
use mods::{Druid, RollType};
use rollconf::RollConfig;
use std::path::Path;
use tracing::{info, warn};

use crate::fetch::MetadataFetcher;

/// Per-run build switches, layered over the `[build]` config section.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Leave the existing catalog.json alone.
    pub no_catalog: bool,
    /// Download object XML even when a cached copy exists.
    pub redownload_xml: bool,
}

/// What a build run did, per roll.
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    pub processed: Vec<Druid>,
    pub skipped: Vec<Druid>,
}

/// Build documents and realizations for every roll in the roster, then
/// regenerate the catalog.
///
/// A roll that cannot be built is logged and skipped; the run only fails
/// when a non-empty roster produces nothing at all. An empty roster is a
/// no-op that leaves any existing catalog in place.
pub async fn build(
    config: &RollConfig,
    roster: &[Druid],
    opts: &BuildOptions,
) -> Result<BuildOutcome> {
    if roster.is_empty() {
        warn!("roster is empty, nothing to build");
        return Ok(BuildOutcome::default());
    }

    let fetcher = MetadataFetcher::new(&config.metadata.purl_base, config.xml_cache_dir());

    let mut outcome = BuildOutcome::default();
    let mut entries: Vec<CatalogEntry> = Vec::new();

    for druid in roster {
        if config.build.skip.iter().any(|s| s == druid.as_str()) {
            info!("skipping {}", druid);
            outcome.skipped.push(druid.clone());
            continue;
        }

        info!("processing {}...", druid);
        match build_roll(config, &fetcher, druid, opts).await {
            Ok(entry) => {
                outcome.processed.push(druid.clone());
                entries.push(entry);
            }
            Err(e) => {
                warn!("unable to build {}, skipping: {:#}", druid, e);
                outcome.skipped.push(druid.clone());
            }
        }
    }

    if outcome.processed.is_empty() {
        bail!("none of the {} roll(s) in the roster could be built", roster.len());
    }
    info!(
        "built {} roll(s), skipped {}",
        outcome.processed.len(),
        outcome.skipped.len()
    );

    if !opts.no_catalog {
        write_catalog(&mut entries, &config.catalog_file())?;
        info!(
            "wrote {} catalog entries to {}",
            entries.len(),
            config.catalog_file().display()
        );
    }

    Ok(outcome)
}

/// One roll, end to end: metadata, MIDI relocation, hole report, document.
async fn build_roll(
    config: &RollConfig,
    fetcher: &MetadataFetcher,
    druid: &Druid,
    opts: &BuildOptions,
) -> Result<CatalogEntry> {
    let xml = fetcher.fetch(druid, opts.redownload_xml).await?;
    let meta = mods::extract(
        druid,
        &xml,
        &config.metadata.purl_base,
        &config.metadata.iiif_base,
    )?;
    let refined = mods::refine(druid, meta)?;
    info!("roll type is {}...", refined.meta.roll_type);

    // Note realization: relocate, then read its timing off the copy
    let note_output = config.note_output(druid.as_str());
    copy_midi(
        &config.midi_note_dir().join(format!("{druid}_note.mid")),
        &note_output,
    )?;
    let note_bytes = std::fs::read(&note_output)?;
    let tpq = roll_midi::tpq(&note_bytes)?;

    // A 65-note roll has no separate expression file; its note realization
    // doubles as the expressive one
    let exp_name = if refined.meta.roll_type.is_65_note() {
        format!("{druid}_note.mid")
    } else {
        format!("{druid}_exp.mid")
    };
    let exp_output = config.exp_output(druid.as_str());
    copy_midi(&config.midi_exp_dir().join(exp_name), &exp_output)?;

    let mut doc = RollDocument::new(&refined, tpq);

    if config.build.tempo_maps {
        let events = roll_midi::tempo_map(&note_bytes)?;
        doc.tempo_map = Some(events.into_iter().map(|e| (e.tick, e.bpm)).collect());
    }

    attach_hole_report(config, druid, refined.meta.roll_type, &exp_output, &mut doc)?;

    doc.write(&config.json_output(druid.as_str()))?;

    Ok(CatalogEntry::from_document(druid.clone(), &doc))
}

/// Parse the roll's hole-analysis report (when one exists), align the
/// expressive velocities onto the holes, and fold it all into the document.
fn attach_hole_report(
    config: &RollConfig,
    druid: &Druid,
    roll_type: RollType,
    exp_midi: &Path,
    doc: &mut RollDocument,
) -> Result<()> {
    let report_path = config.analysis_dir().join(format!("{druid}.txt"));
    if !report_path.exists() {
        info!(
            "no hole analysis for {} at {}",
            druid,
            report_path.display()
        );
        return Ok(());
    }

    let text = std::fs::read_to_string(&report_path)?;
    let mut report = aton::parse(&text);
    for warning in &report.warnings {
        warn!("{}: {}", druid, warning);
    }
    info!("dropped holes: {}", report.dropped);

    if !report.holes.is_empty() {
        match report.geometry.first_hole_px() {
            Some(first_hole) => {
                let bytes = std::fs::read(exp_midi)?;
                let index = roll_midi::velocity_index(&bytes, roll_type.note_tracks())?;
                roll_midi::merge_velocities(&mut report.holes, first_hole, &index);
            }
            None => warn!(
                "{}: hole report has no usable FIRST_HOLE, velocities not merged",
                druid
            ),
        }
    }

    doc.set_report(&report.geometry, &report.holes);
    Ok(())
}

fn copy_midi(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(source, dest).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            source.display(),
            dest.display()
        )
    })?;
    Ok(())
}
