use anyhow::{bail, Result};
use rollconf::RollConfig;
use std::path::Path;
use tracing::info;

/// What a sync run staged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub note_midis: usize,
    pub exp_midis: usize,
    pub reports: usize,
}

/// Clone or update the roll production repository and stage its files in
/// the working tree layout the build step expects.
pub async fn sync(config: &RollConfig, source_url: Option<&str>) -> Result<SyncReport> {
    let url = source_url.unwrap_or(&config.source.repo_url);
    rollpub::clone_or_update(url, &config.source.checkout_dir).await?;

    let checkout = &config.source.checkout_dir;
    let report = SyncReport {
        note_midis: relocate(
            &checkout.join(&config.source.note_midi_path),
            &config.midi_note_dir(),
            "mid",
        )?,
        exp_midis: relocate(
            &checkout.join(&config.source.exp_midi_path),
            &config.midi_exp_dir(),
            "mid",
        )?,
        reports: relocate(
            &checkout.join(&config.source.txt_path),
            &config.analysis_dir(),
            "txt",
        )?,
    };

    info!(
        "staged {} note MIDI(s), {} expression MIDI(s), {} hole report(s)",
        report.note_midis, report.exp_midis, report.reports
    );
    Ok(report)
}

/// Copy every `*.extension` file under `source` into `dest`, flattening any
/// subdirectory structure. File names are unique per DRUID, so collisions
/// would mean duplicate rolls in the source tree.
fn relocate(source: &Path, dest: &Path, extension: &str) -> Result<usize> {
    if !source.is_dir() {
        bail!("source folder {} does not exist", source.display());
    }
    std::fs::create_dir_all(dest)?;

    let mut copied = 0;
    for entry in walkdir::WalkDir::new(source)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == extension)
        })
    {
        let Some(name) = entry.path().file_name() else {
            continue;
        };
        std::fs::copy(entry.path(), dest.join(name))?;
        copied += 1;
    }
    Ok(copied)
}
