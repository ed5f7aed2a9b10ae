//! Configuration sections for the pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Filesystem roots for the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Working directory: the checkout of the data repository the pipeline
    /// reads inputs from and publishes outputs into.
    /// Default: .
    #[serde(default = "PathsConfig::default_root")]
    pub root: PathBuf,
}

impl PathsConfig {
    fn default_root() -> PathBuf {
        PathBuf::from(".")
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
        }
    }
}

/// Upstream repository that holds the raw roll-scan outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Repository to clone the raw realizations and hole reports from.
    #[serde(default = "SourceConfig::default_repo_url")]
    pub repo_url: String,

    /// Where the upstream checkout lives between runs.
    /// Default: ~/.cache/rollatron/source
    #[serde(default = "SourceConfig::default_checkout_dir")]
    pub checkout_dir: PathBuf,

    /// Checkout sub-path holding note MIDI realizations.
    /// Default: midi/note
    #[serde(default = "SourceConfig::default_note_midi_path")]
    pub note_midi_path: PathBuf,

    /// Checkout sub-path holding expressive MIDI realizations.
    /// Default: midi/exp
    #[serde(default = "SourceConfig::default_exp_midi_path")]
    pub exp_midi_path: PathBuf,

    /// Checkout sub-path holding hole-analysis reports.
    /// Default: txt
    #[serde(default = "SourceConfig::default_txt_path")]
    pub txt_path: PathBuf,
}

impl SourceConfig {
    fn default_repo_url() -> String {
        "https://github.com/pianolatron/roll-production.git".to_string()
    }

    fn default_checkout_dir() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.cache_dir().join("rollatron/source"))
            .unwrap_or_else(|| PathBuf::from(".rollatron/source"))
    }

    fn default_note_midi_path() -> PathBuf {
        PathBuf::from("midi/note")
    }

    fn default_exp_midi_path() -> PathBuf {
        PathBuf::from("midi/exp")
    }

    fn default_txt_path() -> PathBuf {
        PathBuf::from("txt")
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repo_url: Self::default_repo_url(),
            checkout_dir: Self::default_checkout_dir(),
            note_midi_path: Self::default_note_midi_path(),
            exp_midi_path: Self::default_exp_midi_path(),
            txt_path: Self::default_txt_path(),
        }
    }
}

/// Endpoints used to resolve roll metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// PURL service base; `{base}{druid}.xml` resolves a roll's MODS record.
    /// Default: https://purl.stanford.edu/
    #[serde(default = "MetadataConfig::default_purl_base")]
    pub purl_base: String,

    /// IIIF image service base used to build display-image URLs.
    /// Default: https://stacks.stanford.edu/image/iiif
    #[serde(default = "MetadataConfig::default_iiif_base")]
    pub iiif_base: String,
}

impl MetadataConfig {
    fn default_purl_base() -> String {
        "https://purl.stanford.edu/".to_string()
    }

    fn default_iiif_base() -> String {
        "https://stacks.stanford.edu/image/iiif".to_string()
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            purl_base: Self::default_purl_base(),
            iiif_base: Self::default_iiif_base(),
        }
    }
}

/// Build-step settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Folder with note (DIR/note/DRUID_note.mid) and expression
    /// (DIR/exp/DRUID_exp.mid) realizations, relative to the root.
    /// Default: midi
    #[serde(default = "BuildConfig::default_midi_source_dir")]
    pub midi_source_dir: PathBuf,

    /// Folder with hole-analysis reports (DRUID.txt), relative to the root.
    /// Default: input/txt
    #[serde(default = "BuildConfig::default_analysis_source_dir")]
    pub analysis_source_dir: PathBuf,

    /// Embed tempo maps in per-roll documents. The playback application
    /// computes timing itself, so this is off by default.
    #[serde(default)]
    pub tempo_maps: bool,

    /// Rolls never built: duplicate accessions or withdrawn scans.
    #[serde(default = "BuildConfig::default_skip")]
    pub skip: Vec<String>,
}

impl BuildConfig {
    fn default_midi_source_dir() -> PathBuf {
        PathBuf::from("midi")
    }

    fn default_analysis_source_dir() -> PathBuf {
        PathBuf::from("input/txt")
    }

    fn default_skip() -> Vec<String> {
        vec!["rr052wh1991".to_string(), "hm136vg1420".to_string()]
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            midi_source_dir: Self::default_midi_source_dir(),
            analysis_source_dir: Self::default_analysis_source_dir(),
            tempo_maps: false,
            skip: Self::default_skip(),
        }
    }
}

/// Publish-step settings: bot identity and the commit allow-list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Author and committer name recorded on publish commits.
    /// Default: rollatron-bot
    #[serde(default = "PublishConfig::default_author_name")]
    pub author_name: String,

    /// Author and committer email recorded on publish commits.
    #[serde(default = "PublishConfig::default_author_email")]
    pub author_email: String,

    /// Remote pushed to after committing.
    /// Default: origin
    #[serde(default = "PublishConfig::default_remote")]
    pub remote: String,

    /// Branch pushed to.
    /// Default: main
    #[serde(default = "PublishConfig::default_branch")]
    pub branch: String,

    /// Push after committing. Disable for local runs.
    /// Default: true
    #[serde(default = "PublishConfig::default_push")]
    pub push: bool,

    /// Pathspecs a publish commit is restricted to. Files outside this list
    /// are never staged, whatever the build touched.
    #[serde(default = "PublishConfig::default_allow")]
    pub allow: Vec<String>,
}

impl PublishConfig {
    fn default_author_name() -> String {
        "rollatron-bot".to_string()
    }

    fn default_author_email() -> String {
        "rollatron-bot@users.noreply.github.com".to_string()
    }

    fn default_remote() -> String {
        "origin".to_string()
    }

    fn default_branch() -> String {
        "main".to_string()
    }

    fn default_push() -> bool {
        true
    }

    fn default_allow() -> Vec<String> {
        [
            "output/json/*.json",
            "output/midi/note/*.mid",
            "output/midi/exp/*.mid",
            "output/catalog.json",
            "midi/note/*.mid",
            "midi/exp/*.mid",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            author_name: Self::default_author_name(),
            author_email: Self::default_author_email(),
            remote: Self::default_remote(),
            branch: Self::default_branch(),
            push: Self::default_push(),
            allow: Self::default_allow(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_defaults() {
        let paths = PathsConfig::default();
        assert_eq!(paths.root, PathBuf::from("."));
    }

    #[test]
    fn test_source_defaults() {
        let source = SourceConfig::default();
        assert!(source.repo_url.ends_with(".git"));
        assert!(source.checkout_dir.to_string_lossy().contains("rollatron"));
        assert_eq!(source.note_midi_path, PathBuf::from("midi/note"));
        assert_eq!(source.exp_midi_path, PathBuf::from("midi/exp"));
    }

    #[test]
    fn test_metadata_defaults() {
        let metadata = MetadataConfig::default();
        assert_eq!(metadata.purl_base, "https://purl.stanford.edu/");
        assert_eq!(metadata.iiif_base, "https://stacks.stanford.edu/image/iiif");
    }

    #[test]
    fn test_build_defaults() {
        let build = BuildConfig::default();
        assert_eq!(build.midi_source_dir, PathBuf::from("midi"));
        assert_eq!(build.analysis_source_dir, PathBuf::from("input/txt"));
        assert!(!build.tempo_maps);
        assert_eq!(build.skip.len(), 2);
    }

    #[test]
    fn test_publish_defaults() {
        let publish = PublishConfig::default();
        assert_eq!(publish.remote, "origin");
        assert_eq!(publish.branch, "main");
        assert!(publish.push);
        assert_eq!(publish.allow.len(), 6);
        assert!(publish.allow.contains(&"output/catalog.json".to_string()));
    }
}
